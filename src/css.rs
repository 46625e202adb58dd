// this_file: fontman/src/css.rs
//
// @font-face stylesheet generation

use crate::manifest::Family;
use std::collections::BTreeMap;

/// Generate @font-face rules for every variant that has at least one file
pub fn generate_css(families: &BTreeMap<String, Family>) -> String {
    let mut lines = vec![
        "/* Generated by fontman - DO NOT EDIT */".to_string(),
        "/* Run 'fontman' to regenerate */".to_string(),
        String::new(),
    ];

    for (name, family) in families {
        lines.push(format!("/* {} */", name.replace("*/", "* /")));

        for variant in &family.variants {
            if variant.files.is_empty() {
                continue;
            }

            // BTreeMap order is woff2, ttf, otf
            let sources: Vec<String> = variant
                .files
                .iter()
                .map(|(format, path)| {
                    format!("url('../{}') format('{}')", path, format.css_format())
                })
                .collect();

            lines.push(format!(
                "@font-face {{\n  font-family: '{}';\n  font-style: {};\n  font-weight: {};\n  font-display: swap;\n  src: {};\n}}",
                name.replace('\'', "\\'"),
                variant.style.as_str(),
                variant.weight,
                sources.join(",\n       ")
            ));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        font::FontFormat,
        manifest::{Style, Variant},
    };

    fn families(family: Family) -> BTreeMap<String, Family> {
        let mut map = BTreeMap::new();
        map.insert(family.family.clone(), family);
        map
    }

    #[test]
    fn test_woff2_only_variant() {
        let mut family = Family::new("Foo");
        let mut variant = Variant::new(400, Style::Normal);
        variant
            .files
            .insert(FontFormat::Woff2, "woff2/Foo-Regular.woff2".to_string());
        family.variants.push(variant);

        let css = generate_css(&families(family));
        assert_eq!(css.matches("@font-face").count(), 1);
        assert!(css.contains("src: url('../woff2/Foo-Regular.woff2') format('woff2');\n"));
        assert!(!css.contains("truetype"));
    }

    #[test]
    fn test_variant_without_files_skipped() {
        let mut family = Family::new("Foo");
        family.variants.push(Variant::new(400, Style::Normal));
        let mut bold = Variant::new(700, Style::Italic);
        bold.files
            .insert(FontFormat::Ttf, "ttf/Foo-BoldItalic.ttf".to_string());
        family.variants.push(bold);

        let css = generate_css(&families(family));
        assert_eq!(css.matches("@font-face").count(), 1);
        assert!(css.contains("font-style: italic;"));
        assert!(css.contains("font-weight: 700;"));
        assert!(!css.contains("font-weight: 400;"));
    }

    #[test]
    fn test_source_order_and_layout() {
        let mut family = Family::new("Foo");
        let mut variant = Variant::new(400, Style::Normal);
        variant
            .files
            .insert(FontFormat::Ttf, "ttf/Foo-Regular.ttf".to_string());
        variant
            .files
            .insert(FontFormat::Woff2, "woff2/Foo-Regular.woff2".to_string());
        family.variants.push(variant);

        let css = generate_css(&families(family));
        let expected = concat!(
            "/* Generated by fontman - DO NOT EDIT */\n",
            "/* Run 'fontman' to regenerate */\n",
            "\n",
            "/* Foo */\n",
            "@font-face {\n",
            "  font-family: 'Foo';\n",
            "  font-style: normal;\n",
            "  font-weight: 400;\n",
            "  font-display: swap;\n",
            "  src: url('../woff2/Foo-Regular.woff2') format('woff2'),\n",
            "       url('../ttf/Foo-Regular.ttf') format('truetype');\n",
            "}\n",
        );
        assert_eq!(css, expected);
    }

    #[test]
    fn test_families_in_name_order() {
        let mut map = families(Family::new("Zed"));
        map.insert("Alpha".to_string(), Family::new("Alpha"));
        let css = generate_css(&map);
        assert!(css.find("/* Alpha */").unwrap() < css.find("/* Zed */").unwrap());
    }

    #[test]
    fn test_family_name_cannot_close_comment() {
        let mut family = Family::new("Foo */ body { color: red } /*");
        let mut variant = Variant::new(400, Style::Normal);
        variant
            .files
            .insert(FontFormat::Ttf, "ttf/Foo-Regular.ttf".to_string());
        family.variants.push(variant);

        let css = generate_css(&families(family));
        assert_eq!(
            css.lines().nth(3),
            Some("/* Foo * / body { color: red } /* */")
        );
    }
}
