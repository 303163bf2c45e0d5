use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use crate::{PField, PStruct, type_text};

/// Generates the `Describe` and `FieldType` impls for a parsed struct.
pub(crate) fn process_struct(parsed: &PStruct) -> TokenStream {
    let name = &parsed.name;
    let type_name = name.to_string();
    let bind = parsed.bind;

    let mut pipe_helpers = Vec::new();
    let mut methods = Vec::new();
    for method in &parsed.pipes {
        let method_name = method.to_string();
        let call = format_ident!("__pipe_{}", method);
        let returns = format_ident!("__pipe_{}_returns", method);
        let returns_name = format_ident!("__pipe_{}_returns_name", method);
        pipe_helpers.push(quote! {
            fn #call(
                node: &::hexjson::JsonNode,
            ) -> ::core::result::Result<
                ::std::boxed::Box<dyn ::core::any::Any + ::core::marker::Send>,
                ::hexjson::ConvertError,
            > {
                ::hexjson::bind::erase_pipe(#name::#method, node)
            }
            fn #returns() -> ::core::any::TypeId {
                ::hexjson::bind::pipe_return_id(#name::#method)
            }
            fn #returns_name() -> &'static str {
                ::hexjson::bind::pipe_return_name(#name::#method)
            }
        });
        methods.push(quote! {
            ::hexjson::bind::MethodShape {
                name: #method_name,
                call: #call,
                returns: #returns,
                returns_name: #returns_name,
            }
        });
    }

    let members = parsed.fields.iter().map(member_shape);

    let stores = parsed
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.is_bound())
        .map(|(index, field)| field_store(name, index, field));

    quote! {
        #[automatically_derived]
        impl ::hexjson::bind::Describe for #name {
            fn shape() -> &'static ::hexjson::bind::TypeShape {
                #(#pipe_helpers)*

                static MEMBERS: &[::hexjson::bind::MemberShape] = &[#(#members),*];
                static METHODS: &[::hexjson::bind::MethodShape] = &[#(#methods),*];
                static SHAPE: ::hexjson::bind::TypeShape = ::hexjson::bind::TypeShape {
                    type_name: #type_name,
                    type_id: ::core::any::TypeId::of::<#name>,
                    bind: #bind,
                    members: MEMBERS,
                    methods: METHODS,
                };
                &SHAPE
            }

            fn stores() -> ::std::vec::Vec<::hexjson::bind::FieldStore<Self>> {
                ::std::vec![#(#stores),*]
            }
        }

        #[automatically_derived]
        impl ::hexjson::bind::FieldType for #name {
            fn desc() -> ::hexjson::bind::TypeDesc {
                ::hexjson::bind::bound_desc::<Self>()
            }

            fn converter(
                linker: &mut ::hexjson::bind::Linker<'_>,
                _desc: &::hexjson::bind::FieldDescriptor,
            ) -> ::core::result::Result<::hexjson::bind::Converter<Self>, ::hexjson::BindingError> {
                ::hexjson::bind::bound_converter::<Self>(linker)
            }
        }
    }
}

fn member_shape(field: &PField) -> TokenStream {
    let member = field.name.to_string();
    let ty = &field.ty;
    let declared = type_text(ty);
    let key = option_str(field.key.as_deref());
    let pipe = option_str(field.pipe.as_deref());
    let access = match &field.setter {
        Some(setter) => {
            let setter = setter.to_string();
            quote! { ::hexjson::bind::Access::Setter(#setter) }
        }
        None => quote! { ::hexjson::bind::Access::Field },
    };
    let desc = if field.is_bound() && field.pipe.is_none() {
        quote! { ::core::option::Option::Some(<#ty as ::hexjson::bind::FieldType>::desc) }
    } else {
        quote! { ::core::option::Option::None }
    };

    quote! {
        ::hexjson::bind::MemberShape {
            name: #member,
            type_name: #declared,
            key: #key,
            access: #access,
            writable: true,
            ty: #desc,
            pipe: #pipe,
        }
    }
}

fn option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}

fn field_store(owner: &Ident, index: usize, field: &PField) -> TokenStream {
    let ty = &field.ty;
    let member = &field.name;
    let convert = if field.pipe.is_some() {
        quote! { linker.piped::<#ty>(desc)? }
    } else {
        quote! { linker.converter::<#ty>(desc)? }
    };
    let assign = match &field.setter {
        Some(setter) => quote! { target.#setter(convert(node)?); },
        None => quote! { target.#member = convert(node)?; },
    };
    let index = Literal::usize_unsuffixed(index);

    quote! {
        ::hexjson::bind::FieldStore::new(#index, |linker, desc| {
            let convert = #convert;
            let store: ::hexjson::bind::StoreOp<#owner> = ::std::boxed::Box::new(
                move |target: &mut #owner, node: &::hexjson::JsonNode| {
                    #assign
                    ::core::result::Result::Ok(())
                },
            );
            ::core::result::Result::Ok(store)
        })
    }
}
