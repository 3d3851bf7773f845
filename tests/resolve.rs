//! End-to-end resolution of the deployment documents in `tests/data`.

use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::bail;
use kubedeploy::{
    Error,
    config::{
        self, Configuration, EnvSpec, Source,
        rt::{RtcDeploy, decode_secret_config},
    },
    vault::SecretStore,
};

/// A secret store double, recording the lookups.
#[derive(Default)]
struct FakeStore {
    offline: bool,
    lookups: RefCell<Vec<&'static str>>,
}

impl SecretStore for FakeStore {
    fn token(&self) -> anyhow::Result<String> {
        self.lookups.borrow_mut().push("token");
        if self.offline {
            bail!("connection refused");
        }
        Ok("s.test-token".into())
    }

    fn address(&self) -> anyhow::Result<String> {
        self.lookups.borrow_mut().push("address");
        Ok("https://vault.example.com:8200".into())
    }
}

fn data(name: &str) -> PathBuf {
    let cwd = std::env::current_dir().expect("error getting cwd");
    cwd.join("tests").join("data").join(name)
}

fn resolve(name: &str) -> kubedeploy::Result<RtcDeploy> {
    config::load(data(name), &FakeStore::default())
}

fn names(spec: &EnvSpec) -> Vec<&str> {
    spec.environment_vars
        .iter()
        .map(|var| var.name.as_str())
        .collect()
}

fn values<'a>(spec: &'a EnvSpec, name: &str) -> Vec<&'a str> {
    spec.environment_vars
        .iter()
        .filter(|var| var.name == name)
        .map(|var| var.value.as_str())
        .collect()
}

#[test]
fn scenario_single_instance() {
    let rtc = resolve("scenario.yaml").expect("must resolve");

    let (_, instances) = rtc.select("dev", "prod-1").expect("must select");
    let spec = &instances[0].env_spec;

    assert_eq!(
        names(spec),
        [
            "DEBUG",
            "VAULT_ADDR",
            "VAULT_TOKEN",
            "DEPLOY_ENVIRONMENT",
            "DEPLOY_INSTANCE",
            "DEPLOY_CLUSTER",
            "SECRET_CONFIG",
        ]
    );
    assert_eq!(spec.var("DEBUG"), Some("true"));
    assert_eq!(spec.var("VAULT_ADDR"), Some("https://vault.example.com:8200"));
    assert_eq!(spec.var("VAULT_TOKEN"), Some("s.test-token"));
    assert_eq!(spec.var("DEPLOY_ENVIRONMENT"), Some("dev"));
    assert_eq!(spec.var("DEPLOY_INSTANCE"), Some("prod-1"));
    assert_eq!(spec.var("DEPLOY_CLUSTER"), Some("k1"));

    assert_eq!(spec.secrets.len(), 1);
    assert_eq!(
        spec.secrets[0].secret_path,
        "secret/kubernetes/k1/sa1/kube-config"
    );
    assert_eq!(
        spec.secrets[0].destinations().collect::<Vec<_>>(),
        ["CLUSTER_CA", "CLUSTER_SERVER", "USER_TOKEN"]
    );

    let secret_config = spec.var("SECRET_CONFIG").expect("must have secret config");
    assert_eq!(
        decode_secret_config(secret_config).expect("must decode"),
        spec.secrets
    );
}

#[test]
fn scenario_defaults() {
    let rtc = resolve("scenario.yaml").expect("must resolve");

    assert_eq!(rtc.container.repo, "premiereglobal/kube-vault-deploy");
    assert_eq!(rtc.container.tag, "0.3.1");
    assert_eq!(rtc.script, "deploy.sh");
    assert_eq!(rtc.directory, data(""));
    assert_eq!(rtc.script_path(), data("deploy.sh"));
}

#[test]
fn layered_precedence() {
    let rtc = resolve("layered.yaml").expect("must resolve");

    assert_eq!(rtc.container.image(), "acme/kube-deploy:0.3.1");
    assert_eq!(rtc.directory, data("deploy"));
    assert_eq!(rtc.script_path(), data("deploy").join("apply.sh"));

    let dev = rtc.environment("dev").expect("must have dev");

    // instance beats environment and global, and appears once
    let west = &dev.instance("us-west-2").expect("must exist").env_spec;
    assert_eq!(values(west, "FOO"), ["a"]);
    assert_eq!(values(west, "ONLY_GLOBAL"), ["g"]);
    assert_eq!(west.kubernetes.cluster, "dev-cluster");
    assert_eq!(west.kubernetes.service_account, "deployer");
    assert_eq!(west.var("DEPLOY_CLUSTER"), Some("dev-cluster"));

    // environment beats global, the global value is kept behind it
    let east = &dev.instance("us-east-1").expect("must exist").env_spec;
    assert_eq!(east.var("FOO"), Some("b"));
    assert_eq!(values(east, "FOO"), ["b", "c"]);
    assert_eq!(values(east, "SHADOWED"), ["environment", "global"]);
    assert_eq!(east.kubernetes.cluster, "east-cluster");

    let paths = east
        .secrets
        .iter()
        .map(|s| s.secret_path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        paths,
        [
            "secret/global/app",
            "secret/dev/db",
            "secret/kubernetes/east-cluster/east-deployer/kube-config",
        ]
    );

    // an empty environment spec falls through to global
    let prod = rtc.environment("prod").expect("must have prod");
    let central = &prod.instance("eu-central-1").expect("must exist").env_spec;
    assert_eq!(central.var("FOO"), Some("c"));
    assert_eq!(central.var("DEPLOY_CLUSTER"), Some("shared"));
    assert_eq!(central.var("DEPLOY_ENVIRONMENT"), Some("prod"));
}

#[test]
fn secret_store_queried_per_instance() {
    let store = FakeStore::default();
    config::load(data("layered.yaml"), &store).expect("must resolve");

    assert_eq!(
        *store.lookups.borrow(),
        ["token", "address", "token", "address", "token", "address"]
    );
}

#[test]
fn err_secret_store_unavailable() {
    let store = FakeStore {
        offline: true,
        ..Default::default()
    };
    let err = config::load(data("layered.yaml"), &store).expect_err("must fail");

    assert!(matches!(err, Error::SecretStoreUnavailable { .. }));
    // fails fast, nothing after the first instance
    assert_eq!(*store.lookups.borrow(), ["token"]);
}

#[test]
fn unquoted_scalar_values() {
    let rtc = resolve("unquoted-scalars.yaml").expect("must resolve");

    let (_, instances) = rtc.select("dev", "1").expect("must select");
    let spec = &instances[0].env_spec;
    assert_eq!(spec.var("PORT"), Some("8080"));
    assert_eq!(spec.var("DEBUG"), Some("true"));
    assert_eq!(spec.var("RATIO"), Some("0.5"));
    assert_eq!(spec.var("DEPLOY_INSTANCE"), Some("1"));
}

#[test]
fn err_duplicate_environment() {
    let err = resolve("duplicate-environment.yaml").expect_err("must fail");
    assert_eq!(
        err.to_string(),
        "error parsing config, duplicate environment name `dev` found"
    );
}

#[test]
fn err_no_instances() {
    let err = resolve("no-instances.yaml").expect_err("must fail");
    assert!(matches!(err, Error::NoInstancesDefined { environment } if environment == "dev"));
}

#[test]
fn err_reserved_instance() {
    let err = resolve("reserved-instance.yaml").expect_err("must fail");
    assert!(matches!(err, Error::ReservedInstanceName { instance, .. } if instance == "All"));
}

#[test]
fn err_reserved_variable_from_global() {
    let err = resolve("reserved-var-global.yaml").expect_err("must fail");
    assert!(matches!(err, Error::ReservedNameConflict { name, .. } if name == "VAULT_ADDR"));
}

#[test]
fn err_reserved_secret_from_environment() {
    let err = resolve("reserved-secret-environment.yaml").expect_err("must fail");
    assert!(matches!(err, Error::ReservedNameConflict { name, .. } if name == "CLUSTER_CA"));
}

#[test]
fn err_missing_cluster() {
    let err = resolve("missing-cluster.yaml").expect_err("must fail");
    assert_eq!(
        err.to_string(),
        "kubernetes cluster is not set for instance `one` in environment `prod`"
    );
}

#[test]
fn err_missing_service_account() {
    let err = resolve("missing-service-account.yaml").expect_err("must fail");
    assert!(matches!(err, Error::MissingServiceAccount { .. }));
}

#[test]
fn err_missing_file() {
    let err = resolve("does-not-exist.yaml").expect_err("must fail");
    assert!(matches!(err, Error::ConfigFileMissing { .. }));
}

#[test]
fn err_not_yaml() {
    let err = resolve("not-yaml.yaml").expect_err("must fail");
    assert!(matches!(err, Error::ConfigNotValidYaml { .. }));
}

#[test]
fn err_wrong_structure() {
    let err = resolve("wrong-structure.yaml").expect_err("must fail");
    assert!(matches!(err, Error::ConfigParse { .. }));
}

/// Injection always appends, so a resolved tree can't be resolved again.
#[test]
fn resolved_tree_is_rejected() {
    let path = data("scenario.yaml");
    let (cfg, _) = Source::File(path.clone()).load().expect("must load");
    let rtc = RtcDeploy::from_config(cfg.clone(), &path, &FakeStore::default())
        .expect("must resolve");

    let mut resolved: Configuration = cfg;
    for environment in &mut resolved.environments {
        let rtc_env = rtc.environment(&environment.name).expect("must exist");
        for instance in &mut environment.instances {
            let rtc_instance = rtc_env.instance(&instance.name).expect("must exist");
            instance.env_spec = Some(rtc_instance.env_spec.clone());
        }
    }

    let err = RtcDeploy::from_config(resolved, &path, &FakeStore::default())
        .expect_err("must fail");
    assert!(matches!(err, Error::ReservedNameConflict { .. }));
}

#[test]
fn inline_source() {
    let rtc = Source::Inline {
        path: data("inline.yaml"),
        content: std::fs::read_to_string(data("scenario.yaml")).expect("must read"),
    }
    .resolve(&FakeStore::default())
    .expect("must resolve");

    assert_eq!(rtc.config_file, data("inline.yaml"));
    assert_eq!(rtc.environments.len(), 1);
}
