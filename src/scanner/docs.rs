//! Doc-comment extraction.
//!
//! `///` and `/** */` comments reach `syn` as `#[doc = "..."]` attributes.
//! Line numbers come from the attribute span, which requires the
//! `span-locations` feature of `proc-macro2`.

use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// One line of documentation and the source line it was written on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    pub text: String,
    pub line: usize,
}

/// Every doc line attached to `attrs`, in source order.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<DocLine> {
    let mut out = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let Meta::NameValue(nv) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &nv.value
        else {
            continue;
        };
        let start = attr.span().start().line;
        let value = s.value();
        let block = value.contains('\n');
        for (offset, raw) in value.lines().enumerate() {
            let text = if block {
                // ` * text` inside block comments
                let trimmed = raw.trim_start();
                trimmed.strip_prefix('*').unwrap_or(trimmed).to_string()
            } else {
                raw.to_string()
            };
            out.push(DocLine {
                text,
                line: start + offset,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments_keep_their_lines() {
        let file: syn::File = syn::parse_str(
            "\n/// Users API.\n/// wire::controller -Prefix=/users\npub struct Users;\n",
        )
        .unwrap();
        let syn::Item::Struct(item) = &file.items[0] else {
            panic!("expected struct");
        };
        let lines = doc_lines(&item.attrs);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, " wire::controller -Prefix=/users");
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn test_block_comment_lines() {
        let file: syn::File = syn::parse_str(
            "/**\n * Service.\n * wire::core -Mode=Transient\n */\nstruct Svc;\n",
        )
        .unwrap();
        let syn::Item::Struct(item) = &file.items[0] else {
            panic!("expected struct");
        };
        let lines = doc_lines(&item.attrs);
        let directive = lines
            .iter()
            .find(|l| l.text.trim_start().starts_with("wire::"))
            .unwrap();
        assert_eq!(directive.text.trim(), "wire::core -Mode=Transient");
        assert_eq!(directive.line, 3);
    }
}
