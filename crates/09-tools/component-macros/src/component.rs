//! 组件注册宏实现

use crate::utils::{arc_inner, decapitalize};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Expr, Fields,
    Ident, ItemStruct, Lit, Meta, Result, Token,
};

/// 组件配置参数
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    /// 自定义组件名称
    pub name: Option<String>,
    /// 组件优先级
    pub priority: i32,
    /// 是否禁用
    pub disabled: bool,
    /// 可用性探测函数路径
    pub guard: Option<syn::Path>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ComponentArgs::default();

        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        for meta in parsed {
            match meta {
                Meta::Path(path) => {
                    if path.is_ident("disabled") {
                        args.disabled = true;
                    } else if path.is_ident("enabled") {
                        args.disabled = false;
                    } else {
                        return Err(syn::Error::new_spanned(path, "未知的组件参数"));
                    }
                }
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("name") {
                        if let Expr::Lit(expr_lit) = &nv.value {
                            if let Lit::Str(lit_str) = &expr_lit.lit {
                                args.name = Some(lit_str.value());
                                continue;
                            }
                        }
                        return Err(syn::Error::new_spanned(nv.value, "name 需要字符串字面量"));
                    } else if nv.path.is_ident("priority") {
                        if let Some(priority) = parse_priority(&nv.value)? {
                            args.priority = priority;
                            continue;
                        }
                        return Err(syn::Error::new_spanned(nv.value, "priority 需要整数字面量"));
                    } else if nv.path.is_ident("guard") {
                        if let Expr::Lit(expr_lit) = &nv.value {
                            if let Lit::Str(lit_str) = &expr_lit.lit {
                                args.guard = Some(lit_str.parse()?);
                                continue;
                            }
                        }
                        return Err(syn::Error::new_spanned(nv.value, "guard 需要函数路径字符串"));
                    } else {
                        return Err(syn::Error::new_spanned(nv.path, "未知的组件参数"));
                    }
                }
                other => return Err(syn::Error::new_spanned(other, "未知的组件参数")),
            }
        }

        Ok(args)
    }
}

/// 解析优先级字面量，允许带负号
fn parse_priority(value: &Expr) -> Result<Option<i32>> {
    match value {
        Expr::Lit(expr_lit) => {
            if let Lit::Int(lit_int) = &expr_lit.lit {
                return Ok(Some(lit_int.base10_parse()?));
            }
            Ok(None)
        }
        Expr::Unary(unary) => {
            if matches!(unary.op, syn::UnOp::Neg(_)) {
                if let Expr::Lit(expr_lit) = unary.expr.as_ref() {
                    if let Lit::Int(lit_int) = &expr_lit.lit {
                        let positive: i32 = lit_int.base10_parse()?;
                        return Ok(Some(-positive));
                    }
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// 展开指定标记的组件宏
pub fn expand(marker: &str, args: TokenStream, input: TokenStream) -> TokenStream {
    let component_args = if args.is_empty() {
        ComponentArgs::default()
    } else {
        match syn::parse::<ComponentArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let input_struct = parse_macro_input!(input as ItemStruct);
    let marker_ident = Ident::new(marker, Span::call_site());

    match expand_struct(&marker_ident, &component_args, &input_struct) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_struct(
    marker: &Ident,
    args: &ComponentArgs,
    input_struct: &ItemStruct,
) -> Result<proc_macro2::TokenStream> {
    let struct_name = &input_struct.ident;
    let component_name = args
        .name
        .clone()
        .unwrap_or_else(|| decapitalize(&struct_name.to_string()));
    let priority = args.priority;
    let enabled = !args.disabled;

    // 生成 Component trait 实现
    let component_impl = quote! {
        impl infrastructure_common::Component for #struct_name {
            fn name(&self) -> &'static str {
                #component_name
            }

            fn priority(&self) -> i32 {
                #priority
            }

            fn is_enabled(&self) -> bool {
                #enabled
            }
        }
    };

    let registerable_impl = generate_registerable_impl(struct_name, &input_struct.fields)?;
    let registration_code = generate_registration_code(
        struct_name,
        marker,
        &component_name,
        priority,
        enabled,
        args.guard.as_ref(),
    );

    Ok(quote! {
        #input_struct

        #component_impl

        #registerable_impl

        #registration_code
    })
}

/// 生成 RegisterableComponent 实现
///
/// 结构体中的每个 `Arc<T>` 字段按声明顺序构成构造依赖，
/// 其余字段用 `Default::default()` 填充。
fn generate_registerable_impl(
    struct_name: &Ident,
    fields: &Fields,
) -> Result<proc_macro2::TokenStream> {
    let named = match fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(unnamed) => {
            return Err(syn::Error::new_spanned(
                unnamed,
                "组件宏不支持元组结构体",
            ));
        }
    };

    let mut dependency_types = Vec::new();
    let mut field_inits = Vec::new();

    for field in &named {
        let field_ident = field.ident.as_ref().expect("命名字段必有标识符");
        if let Some(inner) = arc_inner(&field.ty) {
            dependency_types.push(inner.clone());
            field_inits.push(quote! {
                #field_ident: {
                    let dep = __dependencies.next().ok_or_else(|| {
                        infrastructure_common::DependencyError::creation_failed(
                            std::any::type_name::<#struct_name>(),
                            "构造依赖数量不足",
                        )
                    })?;
                    dep.downcast::<#inner>().map_err(|_| {
                        infrastructure_common::DependencyError::creation_failed(
                            std::any::type_name::<#struct_name>(),
                            "构造依赖类型不匹配",
                        )
                    })?
                }
            });
        } else {
            field_inits.push(quote! {
                #field_ident: ::core::default::Default::default()
            });
        }
    }

    let construct_body = if named.is_empty() {
        quote! { Ok(Self) }
    } else if dependency_types.is_empty() {
        quote! {
            Ok(Self {
                #(#field_inits,)*
            })
        }
    } else {
        quote! {
            let mut __dependencies = dependencies.into_iter();
            Ok(Self {
                #(#field_inits,)*
            })
        }
    };

    Ok(quote! {
        impl di_abstractions::RegisterableComponent for #struct_name {
            fn dependencies() -> Vec<infrastructure_common::TypeInfo> {
                vec![
                    #(infrastructure_common::TypeInfo::of::<#dependency_types>(),)*
                ]
            }

            fn construct(
                dependencies: Vec<std::sync::Arc<dyn std::any::Any + Send + Sync>>,
            ) -> Result<Self, infrastructure_common::DependencyError> {
                let _ = &dependencies;
                #construct_body
            }
        }
    })
}

/// 生成描述符登记代码
///
/// 使用 ctor 在程序启动时向全局登记表提交描述符入口。
fn generate_registration_code(
    struct_name: &Ident,
    marker: &Ident,
    component_name: &str,
    priority: i32,
    enabled: bool,
    guard: Option<&syn::Path>,
) -> proc_macro2::TokenStream {
    let registration_fn_name = Ident::new(
        &format!(
            "__register_component_{}",
            struct_name.to_string().to_lowercase()
        ),
        Span::call_site(),
    );

    let guard_call = guard.map(|path| quote! { #path()?; });

    quote! {
        #[ctor::ctor]
        fn #registration_fn_name() {
            fn __load() -> Result<
                infrastructure_common::ComponentDescriptor,
                infrastructure_common::DescriptorLoadError,
            > {
                #guard_call
                Ok(
                    infrastructure_common::ComponentDescriptor::new::<#struct_name>(
                        infrastructure_common::MarkerKind::#marker,
                    )
                    .with_name(#component_name)
                    .with_priority(#priority)
                    .with_enabled(#enabled),
                )
            }

            fn __dependencies() -> Vec<infrastructure_common::TypeInfo> {
                <#struct_name as di_abstractions::RegisterableComponent>::dependencies()
            }

            fn __construct(
                dependencies: Vec<std::sync::Arc<dyn std::any::Any + Send + Sync>>,
            ) -> Result<
                std::sync::Arc<dyn std::any::Any + Send + Sync>,
                infrastructure_common::DependencyError,
            > {
                let instance =
                    <#struct_name as di_abstractions::RegisterableComponent>::construct(dependencies)?;
                Ok(std::sync::Arc::new(instance))
            }

            infrastructure_common::submit_descriptor_entry(infrastructure_common::DescriptorEntry {
                module_path: module_path!(),
                load: __load,
                dependencies: __dependencies,
                construct: __construct,
            });
        }
    }
}
