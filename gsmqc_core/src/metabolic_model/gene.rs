//! This module provides the Gene struct, representing a gene in the reconstruction

use std::fmt::{Display, Formatter};
use std::hash::Hash;

use derive_builder::Builder;

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Notes about the gene
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Gene Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Gene {
    pub fn new(
        id: String,
        name: Option<String>,
        notes: Option<String>,
        annotation: Option<String>,
    ) -> Gene {
        GeneBuilder::default()
            .id(id)
            .name(name)
            .notes(notes)
            .annotation(annotation)
            .build()
            .unwrap()
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_defaults() {
        let gene = GeneBuilder::default()
            .id("b0001".to_string())
            .build()
            .unwrap();
        assert_eq!(gene.id, "b0001");
        assert!(gene.name.is_none());
        assert!(gene.annotation.is_none());
    }

    #[test]
    fn display_is_id() {
        let gene = Gene::new("thrA".to_string(), Some("ThrA".to_string()), None, None);
        assert_eq!(format!("{}", gene), "thrA");
    }
}
