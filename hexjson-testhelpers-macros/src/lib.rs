#![doc = include_str!("../README.md")]

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    /// Attributes, visibility and qualifiers in front of `fn`
    struct Head {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    /// Generics, arguments and return type between the name and the body
    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct TestFn {
        head: Head,
        _fn: KFn,
        name: Ident,
        signature: Signature,
        body: BraceGroup,
    }
}

impl quote::ToTokens for Head {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

/// Runs `hexjson_testhelpers::setup()` before the test body.
///
/// Import it over the built-in attribute:
///
/// ```ignore
/// use hexjson_testhelpers::test;
///
/// #[test]
/// fn parses() { /* tracing output is captured */ }
/// ```
///
/// An argument replaces the test attribute, e.g.
/// `#[hexjson_testhelpers::test(divan::bench)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut iter = item.to_token_iter();
    let decl = match iter.parse::<TestFn>() {
        Ok(decl) => decl,
        Err(err) => {
            let msg = format!("#[hexjson_testhelpers::test] expects a function: {err}");
            return quote::quote! { compile_error!(#msg); }.into();
        }
    };

    let TestFn {
        head,
        name,
        signature,
        body,
        ..
    } = decl;
    let statements = body.0.stream();

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #test_attr
        #head fn #name #signature {
            ::hexjson_testhelpers::setup();

            #statements
        }
    }
    .into()
}
