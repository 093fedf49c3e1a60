//! Collection of live menu instances
//!
//! Host pages integrate through a registry rather than holding instances
//! themselves: instances are added when created, looked up by root element,
//! and removed when destroyed through the registry. Bulk subscription applies
//! to the instances registered at call time only.

use std::rc::Rc;

use super::{EventHandler, LayeredMenu, ListenerId, MenuCell, MenuHost};
use crate::errors::MenuError;
use crate::models::{MenuConfig, MenuEvent};

pub type SharedMenu<H> = Rc<MenuCell<H>>;

pub struct MenuRegistry<H: MenuHost> {
    instances: Vec<SharedMenu<H>>,
}

impl<H: MenuHost> Default for MenuRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MenuHost> MenuRegistry<H> {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// Construct a menu and register it; the caller still runs `init`
    pub fn create(&mut self, host: H, config: MenuConfig<H::Node>) -> Result<SharedMenu<H>, MenuError> {
        let menu = Rc::new(MenuCell::new(LayeredMenu::new(host, config)?));
        self.register(Rc::clone(&menu));
        Ok(menu)
    }

    /// Register an already constructed menu (ignored if present)
    pub fn register(&mut self, menu: SharedMenu<H>) {
        if !self.instances.iter().any(|existing| Rc::ptr_eq(existing, &menu)) {
            self.instances.push(menu);
        }
    }

    pub fn get(&self, root: &H::Node) -> Option<SharedMenu<H>> {
        self.position(root).map(|idx| Rc::clone(&self.instances[idx]))
    }

    /// Drop the instance owning `root` from the registry without destroying it
    pub fn remove(&mut self, root: &H::Node) -> Option<SharedMenu<H>> {
        self.position(root).map(|idx| self.instances.remove(idx))
    }

    /// Destroy the instance owning `root` and drop it from the registry
    pub fn destroy(&mut self, root: &H::Node) -> bool {
        match self.remove(root) {
            Some(menu) => {
                menu.run(|menu| menu.destroy());
                true
            }
            None => false,
        }
    }

    pub fn reinit(&self, root: &H::Node) -> bool {
        match self.get(root) {
            Some(menu) => {
                menu.run(|menu| menu.reinit());
                true
            }
            None => false,
        }
    }

    pub fn on(&self, root: &H::Node, event: MenuEvent, handler: EventHandler<H::Node>) -> Option<ListenerId> {
        self.get(root).map(|menu| menu.on(event, handler))
    }

    /// Subscribe `handler` on every registered instance; returns how many
    pub fn on_all(&self, event: MenuEvent, handler: EventHandler<H::Node>) -> usize {
        for instance in &self.instances {
            instance.on(event, Rc::clone(&handler));
        }
        self.instances.len()
    }

    pub fn on_init(&self, root: &H::Node, handler: EventHandler<H::Node>) -> Option<ListenerId> {
        self.on(root, MenuEvent::Init, handler)
    }

    pub fn on_change(&self, root: &H::Node, handler: EventHandler<H::Node>) -> Option<ListenerId> {
        self.on(root, MenuEvent::LayerChange, handler)
    }

    pub fn on_any_init(&self, handler: EventHandler<H::Node>) -> usize {
        self.on_all(MenuEvent::Init, handler)
    }

    pub fn on_any_change(&self, handler: EventHandler<H::Node>) -> usize {
        self.on_all(MenuEvent::LayerChange, handler)
    }

    /// Empty the registry, handing back every instance it held
    pub fn take_all(&mut self) -> Vec<SharedMenu<H>> {
        std::mem::take(&mut self.instances)
    }

    /// Destroy every instance and empty the registry
    pub fn destroy_all(&mut self) {
        for instance in self.take_all() {
            instance.run(|menu| menu.destroy());
        }
    }

    pub fn instances(&self) -> &[SharedMenu<H>] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn position(&self, root: &H::Node) -> Option<usize> {
        self.instances.iter().position(|instance| instance.root() == root)
    }
}
