use crate::{
    config::{Configuration, is_all_instances},
    error::{Error, Result},
};
use std::collections::HashMap;

/// Name to position lookup of a structurally valid configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NameIndex {
    pub environments: HashMap<String, usize>,
    /// Instance lookup, per environment, in document order
    pub instances: Vec<HashMap<String, usize>>,
}

/// Check the structure of the configuration, failing on the first violation.
///
/// Environments are walked in document order, and instances in document order within each
/// environment. Names are compared case-sensitively, except for the reserved "all instances"
/// selector.
pub(crate) fn validate(cfg: &Configuration) -> Result<NameIndex> {
    let mut index = NameIndex::default();

    for (i, environment) in cfg.environments.iter().enumerate() {
        if index.environments.contains_key(&environment.name) {
            return Err(Error::DuplicateEnvironmentName {
                name: environment.name.clone(),
            });
        }
        index.environments.insert(environment.name.clone(), i);

        if environment.instances.is_empty() {
            return Err(Error::NoInstancesDefined {
                environment: environment.name.clone(),
            });
        }

        let mut instances = HashMap::with_capacity(environment.instances.len());
        for (j, instance) in environment.instances.iter().enumerate() {
            if instances.contains_key(&instance.name) {
                return Err(Error::DuplicateInstanceName {
                    environment: environment.name.clone(),
                    instance: instance.name.clone(),
                });
            }
            instances.insert(instance.name.clone(), j);

            if is_all_instances(&instance.name) {
                return Err(Error::ReservedInstanceName {
                    environment: environment.name.clone(),
                    instance: instance.name.clone(),
                });
            }
        }
        index.instances.push(instances);
    }

    tracing::debug!(
        environments = index.environments.len(),
        "deployment config structure is valid"
    );

    Ok(index)
}
