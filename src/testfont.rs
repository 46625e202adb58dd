// this_file: fontman/src/testfont.rs
//
// Synthetic fonts for tests: just enough of `name` and `OS/2` for metadata
// extraction, plus arbitrary extra tables.

use std::path::Path;
use write_fonts::{
    tables::{
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
    },
    types::{NameId, Tag},
    FontBuilder,
};

pub(crate) struct TestFont {
    names: Vec<(u16, String)>,
    weight: u16,
    italic: bool,
    extra: Vec<([u8; 4], Vec<u8>)>,
}

impl TestFont {
    pub(crate) fn new(family: &str, style: &str, weight: u16) -> Self {
        let mut names = Vec::new();
        if !family.is_empty() {
            names.push((1, family.to_string()));
        }
        if !style.is_empty() {
            names.push((2, style.to_string()));
        }
        Self {
            names,
            weight,
            italic: false,
            extra: Vec::new(),
        }
    }

    pub(crate) fn designer(mut self, designer: &str) -> Self {
        self.names.push((9, designer.to_string()));
        self
    }

    pub(crate) fn license(mut self, text: &str, url: &str) -> Self {
        self.names.push((13, text.to_string()));
        self.names.push((14, url.to_string()));
        self
    }

    pub(crate) fn italic_flag(mut self) -> Self {
        self.italic = true;
        self
    }

    pub(crate) fn table(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
        self.extra.push((*tag, data.to_vec()));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let os2 = Os2 {
            us_weight_class: self.weight,
            fs_selection: if self.italic {
                SelectionFlags::ITALIC
            } else {
                SelectionFlags::empty()
            },
            ..Default::default()
        };

        // Windows, Unicode BMP, en-US
        let name = Name::new(
            self.names
                .iter()
                .map(|(id, value)| {
                    NameRecord::new(3, 1, 0x409, NameId::new(*id), value.clone().into())
                })
                .collect(),
        );

        let mut builder = FontBuilder::new();
        builder.add_table(&os2).unwrap();
        builder.add_table(&name).unwrap();
        for (tag, data) in &self.extra {
            builder.add_raw(Tag::new(tag), data.clone());
        }
        builder.build()
    }

    pub(crate) fn write(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}
