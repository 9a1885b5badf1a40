use pipeline_builder::cli::action_inputs;
use serial_test::serial;

fn clear_inputs() {
    for name in ["INPUT_TYPE", "INPUT_VERSION", "INPUT_VERSION_CONSTRAINT"] {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn environment_inputs_are_used_when_no_flags_are_given() {
    clear_inputs();
    std::env::set_var("INPUT_TYPE", "jre");
    std::env::set_var("INPUT_VERSION", "8");

    let inputs = action_inputs(None, None, None);

    assert_eq!(inputs.get("type"), Some("jre"));
    assert_eq!(inputs.get("version"), Some("8"));
    assert_eq!(inputs.get("version_constraint"), None);
    clear_inputs();
}

#[test]
#[serial]
fn flags_override_environment_inputs() {
    clear_inputs();
    std::env::set_var("INPUT_TYPE", "jre");
    std::env::set_var("INPUT_VERSION_CONSTRAINT", "^8");

    let inputs = action_inputs(
        Some("jdk".to_string()),
        Some("17".to_string()),
        Some(">=17".to_string()),
    );

    assert_eq!(inputs.get("type"), Some("jdk"));
    assert_eq!(inputs.get("version"), Some("17"));
    assert_eq!(inputs.get("version_constraint"), Some(">=17"));
    clear_inputs();
}
