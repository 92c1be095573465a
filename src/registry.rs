//! Building the group tree.
//!
//! Registration happens through a [`Registrar`], a session object that keeps a
//! stack of the groups currently being defined. The top of the stack is the
//! "current" group: tests and hooks are attached to it, and groups opened by
//! [`describe`](Registrar::describe) become its children.
//!
//! Group bodies are plain synchronous closures that only borrow the registrar,
//! so everything a body registers is known by the time the body returns.
//! Once registration is done, [`finish`](Registrar::finish) turns the session
//! into an immutable [`Suite`].

use std::borrow::Cow;

use thiserror::Error;

use crate::{
    group::{Group, HookKind},
    test::{Test, TestFnHandle},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("{call} must be called within a group")]
    NoCurrentGroup { call: &'static str },

    #[error("registration finished with {open} group(s) still open")]
    UnbalancedGroups { open: usize },
}

/// A fully registered test tree, ready to be handed to [`harness`](crate::harness()).
#[derive(Debug)]
pub struct Suite {
    pub(crate) root: Group,
}

impl Suite {
    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn test_count(&self) -> usize {
        self.root.test_count()
    }
}

/// A registration session.
#[derive(Debug)]
pub struct Registrar {
    stack: Vec<Group>,
}

impl Default for Registrar {
    fn default() -> Self {
        Self {
            stack: vec![Group::root()],
        }
    }
}

impl Registrar {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self, call: &'static str) -> Result<&mut Group, RegistrationError> {
        self.stack
            .last_mut()
            .ok_or(RegistrationError::NoCurrentGroup { call })
    }

    /// Define a group and register its contents.
    ///
    /// The new group becomes the current group while `body` runs and is
    /// appended to the enclosing group afterwards, even if `body` fails.
    pub fn describe<F>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        body: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        F: FnOnce(&mut Self) -> Result<(), RegistrationError>,
    {
        let name = name.into();
        // the enclosing group has to exist before the body runs
        self.current("describe")?;
        tracing::trace!(group = %name, depth = self.stack.len(), "entering group");

        self.stack.push(Group::named(name));
        let res = body(self);
        let group = self
            .stack
            .pop()
            .ok_or(RegistrationError::NoCurrentGroup { call: "describe" })?;
        self.current("describe")?.children.push(group);

        res.map(|_| self)
    }

    /// Register a test in the current group.
    pub fn it(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        action: impl Into<TestFnHandle>,
    ) -> Result<&mut Self, RegistrationError> {
        let name = name.into();
        tracing::trace!(test = %name, "registering test");
        self.current("it")?
            .tests
            .push(Test::new(name, action.into()));
        Ok(self)
    }

    /// Set the before-each hook of the current group.
    pub fn before_each(
        &mut self,
        hook: impl Into<TestFnHandle>,
    ) -> Result<&mut Self, RegistrationError> {
        self.set_hook(HookKind::BeforeEach, "before_each", hook.into())
    }

    /// Set the after-each hook of the current group.
    pub fn after_each(
        &mut self,
        hook: impl Into<TestFnHandle>,
    ) -> Result<&mut Self, RegistrationError> {
        self.set_hook(HookKind::AfterEach, "after_each", hook.into())
    }

    fn set_hook(
        &mut self,
        kind: HookKind,
        call: &'static str,
        hook: TestFnHandle,
    ) -> Result<&mut Self, RegistrationError> {
        let group = self.current(call)?;
        if group.hooks.set(kind, hook).is_some() {
            tracing::debug!(
                group = group.name().unwrap_or_default(),
                hook = kind.label(),
                "hook replaced by a later registration"
            );
        }
        Ok(self)
    }

    /// Close the session.
    pub fn finish(mut self) -> Result<Suite, RegistrationError> {
        let open = self.stack.iter().filter(|group| !group.is_root()).count();
        match self.stack.pop() {
            Some(root) if open == 0 => Ok(Suite { root }),
            Some(_) => Err(RegistrationError::UnbalancedGroups { open }),
            None => Err(RegistrationError::NoCurrentGroup { call: "finish" }),
        }
    }
}

/// Register a whole suite in one go.
///
/// ```
/// let suite = nestest::suite(|s| {
///     s.describe("math", |s| {
///         s.it("adds", || async { assert_eq!(1 + 1, 2) })?;
///         Ok(())
///     })?;
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(suite.test_count(), 1);
/// ```
pub fn suite<F>(body: F) -> Result<Suite, RegistrationError>
where
    F: FnOnce(&mut Registrar) -> Result<(), RegistrationError>,
{
    let mut registrar = Registrar::new();
    body(&mut registrar)?;
    registrar.finish()
}
