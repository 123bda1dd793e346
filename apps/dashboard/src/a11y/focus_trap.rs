//! Keyboard focus confinement for modal dialogs.
//!
//! A trap is installed when a modal opens and released through the disposer
//! the opener keeps (`FocusTrap::release`). Hosts without an explicit close
//! hook can poll `FocusTrap::observe` after structural changes instead; it
//! releases the trap once the modal is no longer attached.
//!
//! The host document is abstracted by [`FocusHost`]. [`ElementTree`] is a
//! small in-memory implementation.

use std::fmt::Debug;

/// What a focus trap needs from the document it runs in.
pub trait FocusHost {
    type Element: Clone + PartialEq + Debug;

    fn active_element(&self) -> Option<Self::Element>;
    fn focus(&mut self, element: &Self::Element);
    fn is_attached(&self, element: &Self::Element) -> bool;
    /// Focusable descendants of `root` in document order.
    fn focusable_descendants(&self, root: &Self::Element) -> Vec<Self::Element>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapState {
    Trapped,
    Inactive,
}

/// Result of routing a Tab key press through the trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The trap moved focus; the host must suppress default Tab handling.
    Redirected,
    /// Focus stays inside the modal on its own; let the host handle the key.
    Default,
    /// The trap has been released and no longer intercepts keys.
    Inactive,
}

#[derive(Debug)]
pub struct FocusTrap<E> {
    modal: E,
    restore_to: Option<E>,
    state: TrapState,
}

impl<E: Clone + PartialEq + Debug> FocusTrap<E> {
    /// Traps focus inside `modal` and focuses its first focusable element.
    ///
    /// Returns `None`, leaving focus where it is, when the modal has nothing
    /// focusable.
    pub fn install<H>(host: &mut H, modal: E) -> Option<Self>
    where
        H: FocusHost<Element = E>,
    {
        let focusables = host.focusable_descendants(&modal);
        let first = focusables.first()?;

        let restore_to = host.active_element();
        host.focus(first);
        tracing::debug!("Focus trap installed on {modal:?}, restore to {restore_to:?}");

        Some(Self {
            modal,
            restore_to,
            state: TrapState::Trapped,
        })
    }

    pub fn state(&self) -> TrapState {
        self.state
    }

    pub fn modal(&self) -> &E {
        &self.modal
    }

    /// Handles Tab (`shift == false`) or Shift+Tab (`shift == true`).
    ///
    /// Tab on the last focusable wraps to the first, Shift+Tab on the first
    /// wraps to the last. Focus found outside the modal is pulled back in.
    pub fn handle_tab<H>(&mut self, host: &mut H, shift: bool) -> KeyOutcome
    where
        H: FocusHost<Element = E>,
    {
        if self.state == TrapState::Inactive {
            return KeyOutcome::Inactive;
        }

        let focusables = host.focusable_descendants(&self.modal);
        let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
            return KeyOutcome::Default;
        };

        let active = host.active_element();
        let inside = active
            .as_ref()
            .is_some_and(|a| focusables.iter().any(|f| f == a));

        let target = match (shift, active.as_ref()) {
            _ if !inside => Some(if shift { last } else { first }),
            (false, Some(a)) if a == last => Some(first),
            (true, Some(a)) if a == first => Some(last),
            _ => None,
        };

        match target {
            Some(target) => {
                let target = target.clone();
                host.focus(&target);
                KeyOutcome::Redirected
            }
            None => KeyOutcome::Default,
        }
    }

    /// Releases the trap and restores the element focused at install time,
    /// if it is still in the document. Releasing twice is a no-op.
    pub fn release<H>(&mut self, host: &mut H)
    where
        H: FocusHost<Element = E>,
    {
        if self.state == TrapState::Inactive {
            return;
        }
        self.state = TrapState::Inactive;

        if let Some(previous) = self.restore_to.take() {
            if host.is_attached(&previous) {
                host.focus(&previous);
            }
        }
        tracing::debug!("Focus trap on {:?} released", self.modal);
    }

    /// Structural fallback: releases the trap once the modal has left the
    /// document. Returns true when this call released it.
    pub fn observe<H>(&mut self, host: &mut H) -> bool
    where
        H: FocusHost<Element = E>,
    {
        if self.state == TrapState::Trapped && !host.is_attached(&self.modal) {
            self.release(host);
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    focusable: bool,
    disabled: bool,
}

/// Minimal document: a body with nested elements, some focusable.
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Node>,
    active: Option<NodeId>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                label: "body".to_string(),
                parent: None,
                children: Vec::new(),
                focusable: false,
                disabled: false,
            }],
            active: None,
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append(&mut self, parent: NodeId, label: &str, focusable: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: label.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            focusable,
            disabled: false,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detaches `id` and its subtree from the document.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        self.nodes[id.0].disabled = disabled;
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id.0].label
    }

    fn collect_focusable(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[id.0].children {
            let node = &self.nodes[child.0];
            if node.focusable && !node.disabled {
                out.push(*child);
            }
            self.collect_focusable(*child, out);
        }
    }
}

impl FocusHost for ElementTree {
    type Element = NodeId;

    fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|a| self.is_attached(a))
    }

    fn focus(&mut self, element: &NodeId) {
        self.active = Some(*element);
    }

    fn is_attached(&self, element: &NodeId) -> bool {
        let mut current = *element;
        loop {
            if current == self.body() {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn focusable_descendants(&self, root: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_focusable(*root, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Page {
        tree: ElementTree,
        opener: NodeId,
        modal: NodeId,
        note: NodeId,
        confirm: NodeId,
        cancel: NodeId,
    }

    fn page_with_modal() -> Page {
        let mut tree = ElementTree::new();
        let body = tree.body();
        let opener = tree.append(body, "status-select", true);
        tree.focus(&opener);

        let modal = tree.append(body, "confirm-modal", false);
        let form = tree.append(modal, "form", false);
        let note = tree.append(form, "note", true);
        let _heading = tree.append(modal, "heading", false);
        let confirm = tree.append(modal, "confirm", true);
        let cancel = tree.append(modal, "cancel", true);

        Page {
            tree,
            opener,
            modal,
            note,
            confirm,
            cancel,
        }
    }

    #[test]
    fn test_install_focuses_first_focusable() {
        let mut p = page_with_modal();
        let trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();
        assert_eq!(trap.state(), TrapState::Trapped);
        assert_eq!(p.tree.active_element(), Some(p.note));
    }

    #[test]
    fn test_tab_wraps_both_directions() {
        let mut p = page_with_modal();
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();

        p.tree.focus(&p.cancel);
        assert_eq!(trap.handle_tab(&mut p.tree, false), KeyOutcome::Redirected);
        assert_eq!(p.tree.active_element(), Some(p.note));

        assert_eq!(trap.handle_tab(&mut p.tree, true), KeyOutcome::Redirected);
        assert_eq!(p.tree.active_element(), Some(p.cancel));
    }

    #[test]
    fn test_tab_in_middle_is_left_to_host() {
        let mut p = page_with_modal();
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();

        p.tree.focus(&p.confirm);
        assert_eq!(trap.handle_tab(&mut p.tree, false), KeyOutcome::Default);
        assert_eq!(trap.handle_tab(&mut p.tree, true), KeyOutcome::Default);
        assert_eq!(p.tree.active_element(), Some(p.confirm));
    }

    #[test]
    fn test_focus_outside_is_pulled_back() {
        let mut p = page_with_modal();
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();

        p.tree.focus(&p.opener);
        assert_eq!(trap.handle_tab(&mut p.tree, true), KeyOutcome::Redirected);
        assert_eq!(p.tree.active_element(), Some(p.cancel));
    }

    #[test]
    fn test_removing_modal_restores_focus() {
        let mut p = page_with_modal();
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();

        assert!(!trap.observe(&mut p.tree));
        p.tree.remove(p.modal);
        assert!(trap.observe(&mut p.tree));
        assert_eq!(trap.state(), TrapState::Inactive);
        assert_eq!(p.tree.active_element(), Some(p.opener));

        // one-shot: nothing further happens
        assert!(!trap.observe(&mut p.tree));
        assert_eq!(trap.handle_tab(&mut p.tree, false), KeyOutcome::Inactive);
    }

    #[test]
    fn test_explicit_release_restores_focus() {
        let mut p = page_with_modal();
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();
        trap.release(&mut p.tree);
        assert_eq!(p.tree.active_element(), Some(p.opener));

        p.tree.focus(&p.confirm);
        trap.release(&mut p.tree);
        assert_eq!(p.tree.active_element(), Some(p.confirm));
    }

    #[test]
    fn test_no_focusable_descendants_is_noop() {
        let mut tree = ElementTree::new();
        let body = tree.body();
        let opener = tree.append(body, "opener", true);
        tree.focus(&opener);
        let modal = tree.append(body, "empty-modal", false);
        tree.append(modal, "text", false);

        assert!(FocusTrap::install(&mut tree, modal).is_none());
        assert_eq!(tree.active_element(), Some(opener));
    }

    #[test]
    fn test_disabled_controls_are_skipped() {
        let mut p = page_with_modal();
        p.tree.set_disabled(p.cancel, true);
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();

        p.tree.focus(&p.confirm);
        assert_eq!(trap.handle_tab(&mut p.tree, false), KeyOutcome::Redirected);
        assert_eq!(p.tree.active_element(), Some(p.note));
    }

    #[test]
    fn test_detached_restore_target_leaves_focus() {
        let mut p = page_with_modal();
        let mut trap = FocusTrap::install(&mut p.tree, p.modal).unwrap();
        p.tree.remove(p.opener);
        trap.release(&mut p.tree);
        assert_eq!(p.tree.active_element(), Some(p.note));
        assert_eq!(p.tree.label(p.note), "note");
    }
}
