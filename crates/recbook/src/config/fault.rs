//! Fault types

use super::names::TREE_FAULT_TYPE;
use crate::error::{Error, Result};
use crate::merge::Named;
use crate::tree::ElementNode;

/// A named kind of fault, stored as element text
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fault {
    pub name: String,
}

impl Fault {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn load(node: &ElementNode) -> Result<Self> {
        let name = node.value();
        if name.is_empty() {
            return Err(Error::invalid_attribute(TREE_FAULT_TYPE, "(text)", "empty fault name"));
        }
        Ok(Self { name })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        parent.add_element_node(TREE_FAULT_TYPE).set_value(&self.name);
    }
}

impl Named for Fault {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_save() -> Result<()> {
        let mut parent = ElementNode::new("Configuration");
        Fault::new("Knocked bar").save(&mut parent);
        let node = parent.element_node(0).cloned().unwrap_or_default();
        assert_eq!(node.name(), "FaultType");
        assert_eq!(Fault::load(&node)?, Fault::new("Knocked bar"));
        Ok(())
    }

    #[test]
    fn test_empty_fault_rejected() {
        assert!(Fault::load(&ElementNode::new("FaultType")).is_err());
    }
}
