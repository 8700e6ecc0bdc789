//! The default lang-item table (spec.md GLOSSARY "Lang item", sec 4.6
//! `get_lang_item_path`). A crate's own `hir::Crate::lang_items` map always
//! takes priority; this is the fallback a freestanding front-end falls back
//! on for the well-known names the operator table and the validator query,
//! mirroring `mesh-typeck::builtins::register_compiler_known_traits`'s
//! one-entry-per-operator registration but as plain path data rather than
//! live `TraitDef`s (trait definitions live in the HIR crate itself; this
//! table only answers "where would `add` live").

use rustc_hash::FxHashMap;

use fec_hir::hir::SimplePath;

fn core(components: &[&str]) -> SimplePath {
    SimplePath::new("core", components.iter().map(|s| s.to_string()).collect())
}

/// Build the default name -> path table. Every operator-trait name used by
/// the table in `crate::operators`, plus `deref`, `copy`, and `sized` (spec.md
/// GLOSSARY examples).
pub fn default_table() -> FxHashMap<String, SimplePath> {
    let mut table = FxHashMap::default();
    let mut put = |name: &str, path: SimplePath| {
        table.insert(name.to_string(), path);
    };

    for name in ["add", "sub", "mul", "div", "rem", "bitand", "bitor", "bitxor", "shl", "shr"] {
        let trait_name = ascii_titlecase(name);
        put(name, core(&["ops", &trait_name]));
    }
    for name in ["add_assign", "sub_assign", "mul_assign", "div_assign", "rem_assign", "bitand_assign", "bitor_assign", "bitxor_assign", "shl_assign", "shr_assign"] {
        let trait_name = format!("{}Assign", ascii_titlecase(name.trim_end_matches("_assign")));
        put(name, core(&["ops", &trait_name]));
    }
    put("eq", core(&["cmp", "PartialEq"]));
    put("ord", core(&["cmp", "Ord"]));
    put("not", core(&["ops", "Not"]));
    put("neg", core(&["ops", "Neg"]));
    put("deref", core(&["ops", "Deref"]));
    put("copy", core(&["marker", "Copy"]));
    put("sized", core(&["marker", "Sized"]));

    table
}

fn ascii_titlecase(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_binop_trait_name_has_an_entry() {
        let table = default_table();
        for name in ["add", "sub", "mul", "div", "rem", "bitand", "bitor", "bitxor", "shl", "shr", "eq", "ord", "not", "neg"] {
            assert!(table.contains_key(name), "missing lang item for `{name}`");
        }
    }

    #[test]
    fn assign_variants_pair_with_their_matching_operator_not_swapped() {
        let table = default_table();
        assert_eq!(table["shl_assign"].last(), Some("ShlAssign"), "spec.md sec 9: the shl/shr assign swap is not reproduced");
        assert_eq!(table["shr_assign"].last(), Some("ShrAssign"));
    }

    #[test]
    fn paths_live_under_the_core_crate() {
        let table = default_table();
        assert_eq!(table["add"].krate, "core");
        assert_eq!(table["add"].components, vec!["ops".to_string(), "Add".to_string()]);
    }
}
