use crate::config::{EnvSpec, EnvironmentVar, Kubernetes, SecretItem};

/// Merge the specs of an instance with the ones of its environment and the global one.
///
/// Instance values take precedence over environment values, which take precedence over global
/// values. The inputs are left untouched.
pub fn merge_env_spec(instance: &EnvSpec, environment: &EnvSpec, global: &EnvSpec) -> EnvSpec {
    EnvSpec {
        kubernetes: Kubernetes {
            service_account: merge_scalar(
                &instance.kubernetes.service_account,
                &environment.kubernetes.service_account,
                &global.kubernetes.service_account,
            ),
            cluster: merge_scalar(
                &instance.kubernetes.cluster,
                &environment.kubernetes.cluster,
                &global.kubernetes.cluster,
            ),
        },
        secrets: merge_secrets(&instance.secrets, &environment.secrets, &global.secrets),
        environment_vars: merge_env_vars(
            &instance.environment_vars,
            &environment.environment_vars,
            &global.environment_vars,
        ),
    }
}

/// First non-empty value wins.
fn merge_scalar(instance: &str, environment: &str, global: &str) -> String {
    [instance, environment]
        .into_iter()
        .find(|value| !value.is_empty())
        .unwrap_or(global)
        .to_string()
}

/// Merge environment variables.
///
/// The instance variables are kept as declared. Environment and global variables are appended
/// unless the instance declares a variable of the same name. Names added by the environment do
/// not shadow global ones, in which case the environment one comes first.
pub fn merge_env_vars(
    instance: &[EnvironmentVar],
    environment: &[EnvironmentVar],
    global: &[EnvironmentVar],
) -> Vec<EnvironmentVar> {
    let declared = |name: &str| instance.iter().any(|var| var.name == name);

    let mut result = instance.to_vec();
    result.extend(
        environment
            .iter()
            .chain(global)
            .filter(|var| !declared(var.name.as_str()))
            .cloned(),
    );
    result
}

/// Merge secrets: global first, then environment, then instance. Nothing is de-duplicated.
pub fn merge_secrets(
    instance: &[SecretItem],
    environment: &[SecretItem],
    global: &[SecretItem],
) -> Vec<SecretItem> {
    global
        .iter()
        .chain(environment)
        .chain(instance)
        .cloned()
        .collect()
}
