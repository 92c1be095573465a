//! The group tree.
//!
//! A [`Group`] holds its tests and child groups in registration order, plus at
//! most one hook per [`HookKind`]. Groups are built by the
//! [`Registrar`](crate::registry::Registrar) and are read-only afterwards.

use std::{borrow::Cow, collections::BTreeMap};

use crate::test::{Test, TestFnHandle};

/// The slot a hook is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookKind {
    BeforeEach,
    AfterEach,
}

impl HookKind {
    pub fn label(self) -> &'static str {
        match self {
            HookKind::BeforeEach => "before each",
            HookKind::AfterEach => "after each",
        }
    }
}

/// Hooks of a single group.
///
/// Every kind holds at most one action, setting a kind again replaces the
/// previous action (last write wins).
#[derive(Debug, Default)]
pub struct Hooks(BTreeMap<HookKind, TestFnHandle>);

impl Hooks {
    /// Set the hook for `kind`, returning the action it replaced.
    pub fn set(&mut self, kind: HookKind, hook: TestFnHandle) -> Option<TestFnHandle> {
        self.0.insert(kind, hook)
    }

    pub fn get(&self, kind: HookKind) -> Option<&TestFnHandle> {
        self.0.get(&kind)
    }
}

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Group {
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) tests: Vec<Test>,
    pub(crate) children: Vec<Group>,
    pub(crate) hooks: Hooks,
}

impl Group {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn named(name: Cow<'static, str>) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    /// The display name, `None` for the root group.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn children(&self) -> &[Group] {
        &self.children
    }

    pub fn hook(&self, kind: HookKind) -> Option<&TestFnHandle> {
        self.hooks.get(kind)
    }

    /// Number of tests in this group and all of its descendants.
    pub fn test_count(&self) -> usize {
        self.tests.len()
            + self
                .children
                .iter()
                .map(|child| child.test_count())
                .sum::<usize>()
    }
}
