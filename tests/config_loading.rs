// tests/config_loading.rs

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;

use tempfile::NamedTempFile;

use hookrunner::config::load_and_validate;
use hookrunner::errors::HookRunnerError;
use hookrunner::hooks::{HookRegistry, InitSelection};
use hookrunner::types::ConcurrencyMode;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_loads_into_registry() {
    let file = write_config(
        r#"
[server]
bind = "127.0.0.1:9000"
strict_task_lookup = true

[hook.deploy]
name = "Deploy site"
secret = "abc"
concurrency = "serial"

[[hook.deploy.init]]
name = "fetch"
command = "git fetch --all"

[[hook.deploy.init]]
name = "clean"
enabled = false
directory = "/tmp"
command = "make clean"

[[hook.deploy.task]]
name = "build"
directory = "/srv/site"
command = "make build"
init = ["fetch"]
conditions = { branch = "main", event = ["push", "tag_push"] }

[[hook.deploy.task]]
name = "docs"
directory = "/srv/docs"
command = "make docs"
init = true

[hook.other]
secret = "xyz"

[[hook.other.task]]
name = "noop"
command = "true"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.server.bind, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    assert!(cfg.server.strict_task_lookup);

    let registry = HookRegistry::from_config(&cfg);
    assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["deploy", "other"]);

    let deploy = registry.lookup("deploy").unwrap();
    assert_eq!(deploy.name, "Deploy site");
    assert_eq!(deploy.concurrency, ConcurrencyMode::Serial);
    assert_eq!(deploy.inits.len(), 2);
    assert!(!deploy.inits[1].enabled);
    assert_eq!(deploy.tasks[0].init, InitSelection::Named(vec!["fetch".into()]));
    assert_eq!(deploy.tasks[0].step.directory.as_deref(), Some(Path::new("/srv/site")));
    assert_eq!(deploy.tasks[0].step.conditions.describe().count(), 2);
    assert_eq!(deploy.tasks[1].init, InitSelection::All);

    let other = registry.lookup("other").unwrap();
    assert_eq!(other.name, "other");
    assert_eq!(other.concurrency, ConcurrencyMode::Parallel);
    assert_eq!(other.tasks[0].init, InitSelection::None);
    assert!(other.tasks[0].step.enabled);
    assert!(other.tasks[0].step.directory.is_none());
}

#[test]
fn defaults_apply_without_server_section() {
    let file = write_config(
        r#"
[hook.deploy]
secret = "abc"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.server.bind, "0.0.0.0:46657".parse::<SocketAddr>().unwrap());
    assert!(!cfg.server.strict_task_lookup);
}

#[test]
fn invalid_glob_returns_structured_error() {
    let file = write_config(
        r#"
[hook.deploy]
secret = "abc"

[[hook.deploy.task]]
name = "build"
command = "make"
conditions = { branch = "{main" }
"#,
    );

    match load_and_validate(file.path()) {
        Err(HookRunnerError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "{main"),
        Err(e) => panic!("Expected InvalidPattern error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn duplicate_init_names_return_config_error() {
    let file = write_config(
        r#"
[hook.deploy]
[[hook.deploy.init]]
name = "fetch"
command = "git fetch"

[[hook.deploy.init]]
name = "fetch"
command = "git pull"
"#,
    );

    match load_and_validate(file.path()) {
        Err(HookRunnerError::ConfigError(msg)) => {
            assert!(msg.contains("init 'fetch' more than once"), "{msg}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn bad_concurrency_value_is_a_toml_error() {
    let file = write_config(
        r#"
[hook.deploy]
concurrency = "queue"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(HookRunnerError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/Hooks.toml"),
        Err(HookRunnerError::IoError(_))
    ));
}
