//! Type Spelling
//!
//! Projects syn types to compact source text, e.g. `&'a str`, `Vec<u8>`,
//! `fn(i32) -> i32`.

use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};
use quote::ToTokens;
use syn::{ReturnType, Type};

/// Spelling of a type as it would be written in source.
pub fn type_spelling(ty: &Type) -> String {
    tokens_spelling(ty)
}

/// Compact spelling of any syntax node, e.g. a trait path or a `use` tree.
pub fn tokens_spelling<T: ToTokens>(node: &T) -> String {
    let mut out = String::new();
    write_tokens(node.to_token_stream(), &mut out);
    out
}

/// Spelling of a return type; the default return is `()`.
pub fn return_spelling(ret: &ReturnType) -> String {
    match ret {
        ReturnType::Default => "()".to_string(),
        ReturnType::Type(_, ty) => type_spelling(ty),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Word,
    /// Punctuation that glues to what follows (`&`, `'`, `::`, `<`, `*`, `!`).
    Glue,
    /// Punctuation followed by a space (`,`, `;`, `=`, `+`, `->`).
    Spaced,
    Close,
}

fn write_tokens(tokens: TokenStream, out: &mut String) {
    let mut prev = Prev::Start;
    let mut iter = tokens.into_iter().peekable();
    while let Some(tt) = iter.next() {
        match tt {
            TokenTree::Ident(ident) => {
                if matches!(prev, Prev::Word | Prev::Close) {
                    out.push(' ');
                }
                out.push_str(&ident.to_string());
                prev = Prev::Word;
            }
            TokenTree::Literal(lit) => {
                if matches!(prev, Prev::Word | Prev::Close) {
                    out.push(' ');
                }
                out.push_str(&lit.to_string());
                prev = Prev::Word;
            }
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::None => ("", ""),
                };
                // `dyn Fn (u8)` reads better as `dyn Fn(u8)`, but `&mut (u8, u8)` keeps its space.
                if prev == Prev::Word && open != "(" && open != "[" {
                    out.push(' ');
                } else if prev == Prev::Word && is_keyword_tail(out) {
                    out.push(' ');
                }
                out.push_str(open);
                write_tokens(group.stream(), out);
                out.push_str(close);
                prev = Prev::Close;
            }
            TokenTree::Punct(punct) => {
                let ch = punct.as_char();
                match ch {
                    ',' | ';' => {
                        out.push(ch);
                        out.push(' ');
                        prev = Prev::Spaced;
                    }
                    '-' if punct.spacing() == Spacing::Joint
                        && matches!(iter.peek(), Some(TokenTree::Punct(p)) if p.as_char() == '>') =>
                    {
                        iter.next();
                        out.push_str(" -> ");
                        prev = Prev::Spaced;
                    }
                    '=' | '+' => {
                        out.push(' ');
                        out.push(ch);
                        out.push(' ');
                        prev = Prev::Spaced;
                    }
                    '>' => {
                        out.push(ch);
                        prev = Prev::Close;
                    }
                    '\'' => {
                        if matches!(prev, Prev::Word | Prev::Close) {
                            out.push(' ');
                        }
                        out.push(ch);
                        prev = Prev::Glue;
                    }
                    _ => {
                        if ch == '&' && matches!(prev, Prev::Word | Prev::Close) {
                            out.push(' ');
                        }
                        out.push(ch);
                        prev = Prev::Glue;
                    }
                }
            }
        }
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
}

/// Whether the text ends with a keyword that needs a space before a group, e.g. `mut (u8, u8)`.
fn is_keyword_tail(out: &str) -> bool {
    ["mut", "dyn", "impl", "const"]
        .iter()
        .any(|kw| out.ends_with(kw) && !out[..out.len() - kw.len()].ends_with(|c: char| c.is_alphanumeric() || c == '_'))
}
