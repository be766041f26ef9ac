//! Built-in language packs.

pub mod javascript;
pub mod python;
pub mod rust;
pub mod typescript;

use crate::lang::pack::LanguagePack;

/// Every pack compiled into the crate.
pub fn builtin() -> Vec<LanguagePack> {
    vec![
        javascript::pack(),
        typescript::pack(),
        typescript::tsx_pack(),
        python::pack(),
        rust::pack(),
    ]
}
