//! `#[derive(Describe)]` input, parsed into [`PStruct`].

use proc_macro2::{Delimiter, Group, Ident, Span, TokenStream, TokenTree};
use unsynn::*;

keyword! {
    KStruct = "struct";
    KEnum = "enum";
    KUnion = "union";
    KPub = "pub";
}

unsynn! {
    /// Visibility: `pub`, `pub(...)` or nothing
    enum Vis {
        PubIn(Cons<KPub, ParenthesisGroup>),
        Pub(KPub),
    }

    /// Outer attribute: `#[...]`
    struct OuterAttr {
        _pound: Pound,
        content: BracketGroup,
    }

    enum AdtKeyword {
        Struct(KStruct),
        Enum(KEnum),
        Union(KUnion),
    }

    /// Everything up to the type name; the rest is inspected by hand
    struct AdtDecl {
        attrs: Vec<OuterAttr>,
        _vis: Option<Vis>,
        keyword: AdtKeyword,
        name: Ident,
        rest: TokenStream,
    }

    /// One named field: `#[json(..)] pub name: Type`
    struct FieldDecl {
        attrs: Vec<OuterAttr>,
        _vis: Option<Vis>,
        name: Ident,
        _colon: Colon,
        ty: TokenStream,
    }
}

/// A compile error to be emitted during code generation
#[derive(Debug, Clone)]
pub struct CompileError {
    /// The error message
    pub message: String,
    /// The span where the error occurred
    pub span: Span,
}

impl CompileError {
    pub(crate) fn new(span: Span, message: impl Into<String>) -> Self {
        CompileError {
            message: message.into(),
            span,
        }
    }

    /// `compile_error!` pointing at the offending tokens.
    pub fn to_compile_error(&self) -> TokenStream {
        let message = &self.message;
        quote::quote_spanned! { self.span =>
            ::core::compile_error!(#message);
        }
    }
}

/// A described struct.
#[derive(Debug)]
pub struct PStruct {
    /// The type name
    pub name: Ident,
    /// `#[json(bind)]`
    pub bind: bool,
    /// Methods registered with `#[json(pipes(..))]`
    pub pipes: Vec<Ident>,
    /// Every named field, in declaration order
    pub fields: Vec<PField>,
}

/// One named field.
#[derive(Debug)]
pub struct PField {
    /// The field name
    pub name: Ident,
    /// The declared type, with `Self` replaced by the struct name
    pub ty: TokenStream,
    /// `key = ".."`
    pub key: Option<String>,
    /// `setter = method`
    pub setter: Option<Ident>,
    /// `pipe = ".."`
    pub pipe: Option<String>,
}

impl PField {
    /// Bound fields carry a JSON key.
    pub fn is_bound(&self) -> bool {
        self.key.is_some()
    }
}

/// Recursively flattens transparent groups (groups with `Delimiter::None`),
/// which `macro_rules!` wraps around captured fragments like `$vis:vis`.
fn flatten_transparent_groups(input: TokenStream) -> TokenStream {
    input
        .into_iter()
        .flat_map(|tt| match tt {
            TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
                flatten_transparent_groups(group.stream())
            }
            TokenTree::Group(group) => {
                let mut new_group =
                    Group::new(group.delimiter(), flatten_transparent_groups(group.stream()));
                new_group.set_span(group.span());
                core::iter::once(TokenTree::Group(new_group)).collect()
            }
            other => core::iter::once(other).collect(),
        })
        .collect()
}

/// Parse derive input. Only non-generic structs with named fields are
/// accepted.
pub fn parse_struct(input: TokenStream) -> std::result::Result<PStruct, CompileError> {
    let input = flatten_transparent_groups(input);
    let mut iter = input.to_token_iter();
    let decl = iter.parse::<AdtDecl>().map_err(|e| {
        CompileError::new(
            Span::call_site(),
            format!("#[derive(Describe)] expects a struct: {e}"),
        )
    })?;

    let kind = match decl.keyword {
        AdtKeyword::Struct(_) => None,
        AdtKeyword::Enum(_) => Some("enums"),
        AdtKeyword::Union(_) => Some("unions"),
    };
    if let Some(kind) = kind {
        return Err(CompileError::new(
            decl.name.span(),
            format!("#[derive(Describe)] does not support {kind}"),
        ));
    }

    let name = decl.name;
    let body = match decl.rest.into_iter().next() {
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Brace => group,
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Parenthesis => {
            return Err(CompileError::new(
                group.span(),
                "#[derive(Describe)] does not support tuple structs",
            ));
        }
        Some(TokenTree::Punct(p)) if p.as_char() == '<' => {
            return Err(CompileError::new(
                p.span(),
                "#[derive(Describe)] does not support generic structs",
            ));
        }
        Some(TokenTree::Ident(i)) if i == "where" => {
            return Err(CompileError::new(
                i.span(),
                "#[derive(Describe)] does not support generic structs",
            ));
        }
        _ => {
            return Err(CompileError::new(
                name.span(),
                "#[derive(Describe)] does not support unit structs",
            ));
        }
    };

    let mut parsed = PStruct {
        name: name.clone(),
        bind: false,
        pipes: Vec::new(),
        fields: Vec::new(),
    };

    for arg in decl.attrs.iter().filter_map(json_args).flatten() {
        let arg = arg?;
        match (arg.name.to_string().as_str(), arg.value) {
            ("bind", ArgValue::None) => parsed.bind = true,
            ("pipes", ArgValue::List(list)) => {
                for tt in list {
                    match tt {
                        TokenTree::Ident(method) => parsed.pipes.push(method),
                        TokenTree::Punct(p) if p.as_char() == ',' => {}
                        other => {
                            return Err(CompileError::new(
                                other.span(),
                                "expected a method name in `pipes(..)`",
                            ));
                        }
                    }
                }
            }
            (other, _) => {
                return Err(CompileError::new(
                    arg.name.span(),
                    format!(
                        "unknown attribute `{other}`, expected `bind` or `pipes(..)` on the type"
                    ),
                ));
            }
        }
    }

    for chunk in split_fields(body.stream()) {
        parsed.fields.push(parse_field(chunk, &name)?);
    }

    Ok(parsed)
}

fn parse_field(chunk: TokenStream, owner: &Ident) -> std::result::Result<PField, CompileError> {
    let span = chunk
        .clone()
        .into_iter()
        .next()
        .map_or_else(Span::call_site, |tt| tt.span());
    let mut iter = chunk.to_token_iter();
    let decl = iter
        .parse::<FieldDecl>()
        .map_err(|e| CompileError::new(span, format!("expected a named field: {e}")))?;

    let mut field = PField {
        name: decl.name,
        ty: replace_self(decl.ty, owner),
        key: None,
        setter: None,
        pipe: None,
    };

    for arg in decl.attrs.iter().filter_map(json_args).flatten() {
        let arg = arg?;
        match (arg.name.to_string().as_str(), arg.value) {
            ("key", ArgValue::Assign(value)) => field.key = Some(string_value(&value)?),
            ("pipe", ArgValue::Assign(value)) => field.pipe = Some(string_value(&value)?),
            ("setter", ArgValue::Assign(TokenTree::Ident(method))) => field.setter = Some(method),
            ("setter", ArgValue::Assign(TokenTree::Literal(lit))) => {
                let name = string_value(&TokenTree::Literal(lit.clone()))?;
                field.setter = Some(Ident::new(&name, lit.span()));
            }
            (other, _) => {
                return Err(CompileError::new(
                    arg.name.span(),
                    format!(
                        "unknown attribute `{other}`, expected `key = \"..\"`, `setter = method` or `pipe = \"..\"`"
                    ),
                ));
            }
        }
    }

    if field.key.is_none() && (field.setter.is_some() || field.pipe.is_some()) {
        return Err(CompileError::new(
            field.name.span(),
            "`setter` and `pipe` only apply to members with a `key`",
        ));
    }

    Ok(field)
}

enum ArgValue {
    None,
    Assign(TokenTree),
    List(TokenStream),
}

struct JsonArg {
    name: Ident,
    value: ArgValue,
}

/// The comma-separated arguments of a `#[json(..)]` attribute, or `None` for
/// any other attribute.
fn json_args(attr: &OuterAttr) -> Option<Vec<std::result::Result<JsonArg, CompileError>>> {
    let mut tokens = attr.content.0.stream().into_iter();
    match tokens.next() {
        Some(TokenTree::Ident(ident)) if ident == "json" => {}
        _ => return None,
    }
    let inner = match tokens.next() {
        Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Parenthesis => g.stream(),
        other => {
            let span = other.map_or_else(|| attr.content.0.span(), |tt| tt.span());
            return Some(vec![Err(CompileError::new(span, "expected `json(..)`"))]);
        }
    };

    let mut args = Vec::new();
    for item in split_top_level(inner) {
        args.push(json_arg(item));
    }
    Some(args)
}

fn json_arg(item: Vec<TokenTree>) -> std::result::Result<JsonArg, CompileError> {
    let mut tokens = item.into_iter();
    let name = match tokens.next() {
        Some(TokenTree::Ident(name)) => name,
        Some(other) => return Err(CompileError::new(other.span(), "expected an identifier")),
        None => return Err(CompileError::new(Span::call_site(), "empty attribute")),
    };
    let value = match (tokens.next(), tokens.next()) {
        (None, _) => ArgValue::None,
        (Some(TokenTree::Punct(eq)), Some(value)) if eq.as_char() == '=' => ArgValue::Assign(value),
        (Some(TokenTree::Group(g)), None) if g.delimiter() == Delimiter::Parenthesis => {
            ArgValue::List(g.stream())
        }
        (Some(other), _) => {
            return Err(CompileError::new(
                other.span(),
                format!("malformed `{name}` attribute"),
            ));
        }
    };
    if let Some(extra) = tokens.next() {
        return Err(CompileError::new(
            extra.span(),
            format!("unexpected tokens after `{name}`"),
        ));
    }
    Ok(JsonArg { name, value })
}

fn string_value(value: &TokenTree) -> std::result::Result<String, CompileError> {
    let text = value.to_string();
    match text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if !inner.contains('\\') => Ok(inner.to_owned()),
        _ => Err(CompileError::new(
            value.span(),
            "expected a plain string literal",
        )),
    }
}

/// Splits on commas outside of any group.
fn split_top_level(stream: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut items = Vec::new();
    let mut current = Vec::new();
    for tt in stream {
        if let TokenTree::Punct(p) = &tt
            && p.as_char() == ','
        {
            if !current.is_empty() {
                items.push(core::mem::take(&mut current));
            }
            continue;
        }
        current.push(tt);
    }
    if !current.is_empty() {
        items.push(current);
    }
    items
}

/// Splits a field list on commas that are neither inside a group nor
/// between the angle brackets of a generic type (`HashMap<K, V>`).
fn split_fields(stream: TokenStream) -> Vec<TokenStream> {
    let mut fields = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    let mut after_dash = false;
    for tt in stream {
        if let TokenTree::Punct(p) = &tt {
            match p.as_char() {
                '<' => depth += 1,
                // `->` in fn pointer types is not a closing bracket
                '>' if !after_dash => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    if !current.is_empty() {
                        fields.push(current.drain(..).collect());
                    }
                    after_dash = false;
                    continue;
                }
                _ => {}
            }
            after_dash = p.as_char() == '-';
        } else {
            after_dash = false;
        }
        current.push(tt);
    }
    if !current.is_empty() {
        fields.push(current.into_iter().collect());
    }
    fields
}

fn replace_self(stream: TokenStream, owner: &Ident) -> TokenStream {
    stream
        .into_iter()
        .map(|tt| match tt {
            TokenTree::Ident(ident) if ident == "Self" => {
                TokenTree::Ident(Ident::new(&owner.to_string(), ident.span()))
            }
            TokenTree::Group(group) => {
                let mut new_group = Group::new(group.delimiter(), replace_self(group.stream(), owner));
                new_group.set_span(group.span());
                TokenTree::Group(new_group)
            }
            other => other,
        })
        .collect()
}

/// Compact spelling of a type for error messages: `Vec<Option<u8>>`.
pub fn type_text(stream: &TokenStream) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    for tt in stream.clone() {
        match tt {
            TokenTree::Ident(ident) => {
                if prev_word {
                    out.push(' ');
                }
                out.push_str(&ident.to_string());
                prev_word = true;
            }
            TokenTree::Literal(lit) => {
                if prev_word {
                    out.push(' ');
                }
                out.push_str(&lit.to_string());
                prev_word = true;
            }
            TokenTree::Punct(p) => {
                out.push(p.as_char());
                if p.as_char() == ',' {
                    out.push(' ');
                }
                prev_word = false;
            }
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::None => ("", ""),
                };
                out.push_str(open);
                out.push_str(&type_text(&group.stream()));
                out.push_str(close);
                prev_word = false;
            }
        }
    }
    out
}
