//! The function table handed to the template engine.

use std::collections::BTreeMap;

use crate::error::{FuncError, FuncResult};
use crate::function::Function;
use crate::value::Value;
use crate::{
    collections, crypto, dates, encoding, generic, math, paths, pattern, random, strings, system,
    urls, version,
};

const GROUPS: &[&[Function]] = &[
    generic::FUNCTIONS,
    collections::FUNCTIONS,
    strings::FUNCTIONS,
    math::FUNCTIONS,
    encoding::FUNCTIONS,
    version::FUNCTIONS,
    pattern::FUNCTIONS,
    urls::FUNCTIONS,
    dates::FUNCTIONS,
    paths::FUNCTIONS,
    system::FUNCTIONS,
    random::FUNCTIONS,
    crypto::FUNCTIONS,
];

/// An immutable name-to-function mapping.
///
/// Build one with [`build_table`] or [`build_hermetic_table`] and pass it to
/// each render; nothing in the crate keeps a global copy.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<&'static str, Function>,
}

impl FunctionTable {
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Looks up `name` and calls it with `args`.
    pub fn call(&self, name: &str, args: &[Value]) -> FuncResult {
        self.get(name)
            .ok_or_else(|| FuncError::UnknownFunction(name.to_string()))?
            .call(args)
    }

    /// Functions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Keeps only the functions for which `keep` returns true.
    pub fn filter(mut self, keep: impl Fn(&Function) -> bool) -> Self {
        self.functions.retain(|_, f| keep(f));
        self
    }
}

impl FromIterator<Function> for FunctionTable {
    fn from_iter<I: IntoIterator<Item = Function>>(iter: I) -> Self {
        let mut functions = BTreeMap::new();
        for f in iter {
            let previous = functions.insert(f.name(), f);
            debug_assert!(previous.is_none(), "duplicate function {}", f.name());
        }
        Self { functions }
    }
}

/// Every registered function.
pub fn build_table() -> FunctionTable {
    GROUPS.iter().flat_map(|group| group.iter().copied()).collect()
}

/// Only the functions whose output depends on nothing but their arguments:
/// no clock, randomness, environment or network.
pub fn build_hermetic_table() -> FunctionTable {
    build_table().filter(Function::is_hermetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const NON_HERMETIC: &[&str] = &[
        "now",
        "date",
        "dateInZone",
        "date_in_zone",
        "dateModify",
        "date_modify",
        "mustDateModify",
        "must_date_modify",
        "ago",
        "toDate",
        "mustToDate",
        "unixEpoch",
        "htmlDate",
        "htmlDateInZone",
        "duration",
        "durationRound",
        "randAlpha",
        "randAlphaNum",
        "randNumeric",
        "randAscii",
        "randBytes",
        "randInt",
        "uuidv4",
        "shuffle",
        "encryptAES",
        "env",
        "expandenv",
        "getHostByName",
    ];

    #[test]
    fn test_no_duplicate_names() {
        let mut seen = HashSet::new();
        for group in GROUPS {
            for f in group.iter() {
                assert!(seen.insert(f.name()), "duplicate function {}", f.name());
            }
        }
        assert_eq!(seen.len(), build_table().len());
    }

    #[test]
    fn test_table_size() {
        assert!(build_table().len() > 150);
    }

    #[test]
    fn test_hermetic_table_excludes_impure_functions() {
        let full = build_table();
        let hermetic = build_hermetic_table();
        for name in NON_HERMETIC {
            assert!(full.contains(name), "{} missing from full table", name);
            assert!(!hermetic.contains(name), "{} leaked into hermetic table", name);
        }
        assert_eq!(hermetic.len(), full.len() - NON_HERMETIC.len());
        assert!(hermetic.contains("upper"));
        assert!(hermetic.contains("decryptAES"));
    }

    #[test]
    fn test_call_by_name() {
        let table = build_table();
        assert_eq!(
            table.call("upper", &["abc".into()]).unwrap(),
            Value::from("ABC")
        );
        assert!(matches!(
            table.call("nope", &[]),
            Err(FuncError::UnknownFunction(_))
        ));
        assert!(matches!(
            table.call("upper", &[]),
            Err(FuncError::Arity { got: 0, .. })
        ));
    }

    #[test]
    fn test_function_contract_names_present() {
        let table = build_table();
        for name in [
            "default", "empty", "coalesce", "deepCopy", "slice", "chunk", "merge", "uniq", "dig",
            "snakecase", "kebabcase", "camelcase", "sha512sum", "adler32sum", "b32enc",
            "semverCompare", "regexSplit", "urlJoin", "mustCompact", "mustFirst",
        ] {
            assert!(table.contains(name), "{} missing", name);
        }
    }
}
