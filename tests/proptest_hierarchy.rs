//! Property-based tests using proptest
//!
//! These tests verify that assembly converges to the same tree whatever the
//! declaration order, and that the dump visits every resource exactly once.

use launchpad::hierarchy::{
    build, AssembledOrg, Folder, Organization, Project, Reference, Resource, ResourceHandler,
    ResourceKind,
};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{BTreeMap, HashMap};

const ORG_ID: &str = "org1";

/// Shape of a random hierarchy: each folder's parent is the org (`None`) or
/// an earlier folder, each project sits under some folder.
#[derive(Debug, Clone)]
struct Layout {
    folder_parents: Vec<Option<usize>>,
    project_parents: Vec<usize>,
}

impl Layout {
    fn len(&self) -> usize {
        self.folder_parents.len() + self.project_parents.len()
    }

    /// Top-level declaration number `n`: folders first, then projects
    fn declaration(&self, n: usize) -> Resource {
        if n < self.folder_parents.len() {
            let parent = match self.folder_parents[n] {
                None => Reference::new(ResourceKind::Organization, ORG_ID),
                Some(p) => Reference::new(ResourceKind::Folder, &format!("f{}", p)),
            };
            let mut folder = Folder::with_parent(&format!("f{}", n), parent);
            folder.spec.display_name = format!("Folder {}", n);
            Resource::Folder(folder)
        } else {
            let i = n - self.folder_parents.len();
            let parent = Reference::new(
                ResourceKind::Folder,
                &format!("f{}", self.project_parents[i]),
            );
            Resource::Project(Project::with_parent(&format!("p{}", i), parent))
        }
    }
}

fn arb_layout() -> impl Strategy<Value = Layout> {
    (
        prop::collection::vec(any::<Index>(), 1..16),
        prop::collection::vec(any::<Index>(), 0..12),
    )
        .prop_map(|(folders, projects)| {
            let folder_parents = folders
                .iter()
                .enumerate()
                .map(|(i, idx)| match idx.index(i + 1) {
                    0 => None,
                    p => Some(p - 1),
                })
                .collect::<Vec<_>>();
            let project_parents = projects
                .iter()
                .map(|idx| idx.index(folder_parents.len()))
                .collect();
            Layout {
                folder_parents,
                project_parents,
            }
        })
}

/// A layout plus a random declaration order
fn arb_shuffled_layout() -> impl Strategy<Value = (Layout, Vec<usize>)> {
    arb_layout().prop_flat_map(|layout| {
        let order: Vec<usize> = (0..layout.len()).collect();
        (Just(layout), Just(order).prop_shuffle())
    })
}

fn declarations(layout: &Layout, order: &[usize], org_at: usize) -> Vec<Resource> {
    let mut resources: Vec<Resource> = order.iter().map(|&n| layout.declaration(n)).collect();
    let org = Resource::Organization(Organization::with_id(ORG_ID));
    resources.insert(org_at.min(resources.len()), org);
    resources
}

fn dump(assembled: &AssembledOrg) -> String {
    let mut out = Vec::new();
    assembled.dump(2, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Parent resource id → child resource ids, as stored in the tree
fn children_by_parent(assembled: &AssembledOrg) -> BTreeMap<String, Vec<String>> {
    fn walk<H: ResourceHandler>(node: &H, out: &mut BTreeMap<String, Vec<String>>) {
        let ids = node.children().iter().map(|c| c.resource_id()).collect();
        out.insert(node.resource_id(), ids);
        for child in node.children() {
            walk(child, out);
        }
    }
    let mut out = BTreeMap::new();
    walk(assembled.org(), &mut out);
    out
}

proptest! {
    /// Children end up under their parent in the order they were declared
    #[test]
    fn children_follow_declaration_order((layout, order) in arb_shuffled_layout()) {
        let assembled = build(declarations(&layout, &order, 0)).unwrap();
        let tree = children_by_parent(&assembled);

        let mut expected: HashMap<String, Vec<String>> = HashMap::new();
        for &n in &order {
            let resource = layout.declaration(n);
            let parent = resource.parent().unwrap().target();
            expected.entry(parent).or_default().push(resource.resource_id());
        }
        for (parent, children) in expected {
            prop_assert_eq!(tree.get(&parent), Some(&children));
        }
    }

    /// Where the organization is declared never changes the result
    #[test]
    fn org_position_is_irrelevant(
        (layout, order) in arb_shuffled_layout(),
        org_at in any::<Index>(),
    ) {
        let first = build(declarations(&layout, &order, 0)).unwrap();
        let anywhere = build(declarations(&layout, &order, org_at.index(order.len() + 1))).unwrap();
        prop_assert_eq!(dump(&first), dump(&anywhere));
    }

    /// Dump has one line per resource, children after and deeper than parents
    #[test]
    fn dump_visits_each_resource_once((layout, order) in arb_shuffled_layout()) {
        let assembled = build(declarations(&layout, &order, 0)).unwrap();
        let output = dump(&assembled);
        let lines: Vec<&str> = output.lines().collect();
        prop_assert_eq!(lines.len(), layout.len() + 1);
        prop_assert_eq!(assembled.len(), layout.len() + 1);

        let mut position: HashMap<&str, (usize, usize)> = HashMap::new();
        for (row, line) in lines.iter().enumerate() {
            let trimmed = line.trim_start();
            let indent = line.len() - trimmed.len();
            let resource_id = trimmed.split(' ').next().unwrap();
            prop_assert!(position.insert(resource_id, (row, indent)).is_none());
        }

        for (parent, children) in children_by_parent(&assembled) {
            let (parent_row, parent_indent) = position[parent.as_str()];
            for child in children {
                let (child_row, child_indent) = position[child.as_str()];
                prop_assert!(child_row > parent_row);
                prop_assert_eq!(child_indent, parent_indent + 2);
            }
        }
    }

    /// Declaring any folder twice is always caught
    #[test]
    fn repeated_folder_is_duplicate(
        (layout, order) in arb_shuffled_layout(),
        pick in any::<Index>(),
    ) {
        let mut resources = declarations(&layout, &order, 0);
        let folder = layout.declaration(pick.index(layout.folder_parents.len()));
        resources.push(folder);

        let err = build(resources).unwrap_err();
        let is_duplicate = matches!(err, launchpad::hierarchy::Error::DuplicateRegistration { .. });
        prop_assert!(is_duplicate);
    }
}
