use crate::object::Object;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Scopes are shared: a function value keeps the scope it was defined in alive
/// for as long as the function itself is reachable.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    store: FxHashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(outer: Env) -> Self {
        Self {
            store: FxHashMap::default(),
            outer: Some(outer),
        }
    }

    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Looks `name` up here, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Binds `name` in this scope only, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Values are left out: closures stored here point back at this scope.
        let mut names: Vec<&String> = self.store.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}
