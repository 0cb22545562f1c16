/// Legacy symbol mangler.
///
/// Produces `_ZN<len><segment>...E` names from a function's qualified path,
/// unless the source pins the symbol name itself. Segments such as
/// `<Foo as Display>` are escaped the way rustc's legacy scheme does
/// (`_$LT$Foo$u20$as$u20$Display$GT$`).

use crate::domain::decl::FunctionDecl;
use crate::ports::NameResolver;

pub struct LegacyMangler;

impl LegacyMangler {
    pub fn mangle_path(path: &[String]) -> String {
        let mut symbol = String::from("_ZN");
        for segment in path {
            let escaped = escape_segment(segment);
            symbol.push_str(&escaped.len().to_string());
            symbol.push_str(&escaped);
        }
        symbol.push('E');
        symbol
    }
}

impl NameResolver for LegacyMangler {
    fn resolve(&self, func: &FunctionDecl) -> String {
        match &func.link_name {
            Some(name) => name.clone(),
            None => Self::mangle_path(&func.path),
        }
    }
}

fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        match ch {
            '<' => out.push_str("$LT$"),
            '>' => out.push_str("$GT$"),
            '&' => out.push_str("$RF$"),
            '*' => out.push_str("$BP$"),
            ',' => out.push_str("$C$"),
            '(' => out.push_str("$LP$"),
            ')' => out.push_str("$RP$"),
            ':' => out.push('.'),
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            c => out.push_str(&format!("$u{:x}$", c as u32)),
        }
    }
    // Symbols may not start with `$`.
    if out.starts_with('$') {
        out.insert(0, '_');
    }
    out
}
