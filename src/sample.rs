//! Built-in example data for both engines.

use crate::graph::{DependencyGraph, GraphResult};
use crate::hierarchy::{HierarchyTree, NodeKind, TreeResult};

/// Root name of the sample university.
pub const SAMPLE_UNIVERSITY: &str = "National University";

const SAMPLE_MODULES: &[(&str, &str)] = &[
    ("Authentication", "User management and login"),
    ("Database", "Data access layer"),
    ("REST API", "Web service interface"),
    ("Validation", "Input validation"),
    ("Logging", "Event logging"),
    ("Reports", "Report generation"),
    ("Notifications", "Notification delivery"),
    ("Payments", "Payment processing"),
];

const SAMPLE_DEPENDENCIES: &[(&str, &str)] = &[
    ("REST API", "Authentication"),
    ("REST API", "Validation"),
    ("Authentication", "Database"),
    ("Authentication", "Logging"),
    ("Reports", "Database"),
    ("Reports", "Authentication"),
    ("Notifications", "Logging"),
    ("Payments", "Authentication"),
    ("Payments", "Database"),
    ("Payments", "Notifications"),
    ("Validation", "Logging"),
];

const SAMPLE_ENTITIES: &[(&str, &str, NodeKind, &str)] = &[
    (SAMPLE_UNIVERSITY, "Faculty of Engineering", NodeKind::Faculty, "Engineering sciences"),
    (SAMPLE_UNIVERSITY, "Faculty of Sciences", NodeKind::Faculty, "Natural sciences and mathematics"),
    ("Faculty of Engineering", "Systems Department", NodeKind::Department, "Computing and informatics"),
    ("Faculty of Engineering", "Industrial Department", NodeKind::Department, "Industrial engineering"),
    ("Faculty of Sciences", "Mathematics Department", NodeKind::Department, "Pure and applied mathematics"),
    ("Systems Department", "BSc in Informatics", NodeKind::Program, "Five-year undergraduate"),
    ("Systems Department", "MSc in Data Science", NodeKind::Program, "Two-year graduate"),
    ("BSc in Informatics", "Data Structures", NodeKind::Course, "Algorithms and structures"),
    ("BSc in Informatics", "Databases", NodeKind::Course, "Information management"),
    ("BSc in Informatics", "Object-Oriented Programming", NodeKind::Course, "Programming paradigms"),
];

/// Adds the sample project modules and their dependencies to `graph`.
///
/// Modules or edges that already exist are left untouched.
pub fn load_sample_project(graph: &mut DependencyGraph) -> GraphResult<()> {
    for (name, description) in SAMPLE_MODULES {
        if !graph.contains(name) {
            graph.add_module(name, description)?;
        }
    }
    for (origin, target) in SAMPLE_DEPENDENCIES {
        if !graph.has_dependency(origin, target) {
            graph.add_dependency(origin, target)?;
        }
    }
    Ok(())
}

/// Builds the sample university hierarchy.
pub fn sample_university() -> TreeResult<HierarchyTree> {
    let mut tree = HierarchyTree::new(SAMPLE_UNIVERSITY);
    for (parent, name, kind, description) in SAMPLE_ENTITIES {
        tree.insert(parent, name, *kind, description)?;
    }
    Ok(tree)
}
