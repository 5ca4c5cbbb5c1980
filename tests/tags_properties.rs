use navsync::tags::{parse, TagForest, TagId};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct RawRecord {
    name: String,
    line: u32,
    kind: &'static str,
    scope: Option<String>,
}

fn record_strategy() -> impl Strategy<Value = RawRecord> {
    (
        "[a-z]{1,6}",
        1u32..10_000,
        prop::sample::select(vec!["function", "class", "member", "variable"]),
        prop::option::of("[a-z]{1,6}"),
    )
        .prop_map(|(name, line, kind, scope)| RawRecord {
            name,
            line,
            kind,
            scope,
        })
}

fn render(records: &[RawRecord]) -> String {
    records
        .iter()
        .map(|r| match &r.scope {
            Some(scope) => format!(
                "{}\tf.py\t/^p/;\"\t{}\tline:{}\tclass:{}",
                r.name, r.kind, r.line, scope
            ),
            None => format!("{}\tf.py\t/^p/;\"\t{}\tline:{}", r.name, r.kind, r.line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Depth-first walk from the roots collecting every reachable id exactly
/// once; panics (via the visited check) if a node shows up twice.
fn collect(forest: &TagForest) -> HashSet<TagId> {
    let mut visited = HashSet::new();
    let mut stack: Vec<TagId> = forest.roots().to_vec();
    while let Some(id) = stack.pop() {
        assert!(visited.insert(id), "node reachable twice");
        stack.extend(forest.children(id).iter().copied());
    }
    visited
}

proptest! {
    #[test]
    fn parse_builds_acyclic_forest(records in prop::collection::vec(record_strategy(), 0..40)) {
        let forest = parse(&render(&records)).unwrap();

        let expected = records.iter().filter(|r| r.kind != "variable").count();
        prop_assert_eq!(forest.len(), expected);

        // Every node is reachable from exactly one root.
        let visited = collect(&forest);
        prop_assert_eq!(visited.len(), forest.len());

        // Roots are parentless; every other parent chain terminates at a
        // root within len steps.
        for &root in forest.roots() {
            prop_assert!(forest.get(root).parent.is_none());
        }
        for &id in &visited {
            let mut cursor = Some(id);
            let mut steps = 0;
            while let Some(current) = cursor {
                cursor = forest.get(current).parent;
                steps += 1;
                prop_assert!(steps <= forest.len(), "parent chain does not terminate");
            }
        }
    }

    #[test]
    fn empty_and_whitespace_free_inputs(names in prop::collection::vec("[a-z]{1,6}", 0..10)) {
        let raw = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}\tf.py\t/^p/;\"\tfunction\tline:{}", name, i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let forest = parse(&raw).unwrap();
        prop_assert_eq!(forest.len(), names.len());
        prop_assert_eq!(forest.roots().len(), names.len());
    }
}
