//! System-wide default constants.

// ============================================================================
// Config loading
// ============================================================================

/// Environment variable holding the path to the config TOML file.
pub const CONFIG_ENV_VAR: &str = "CONTENT_TESTING_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "content_testing.toml";

// ============================================================================
// Editor commands
// ============================================================================

/// Command token bound to the "create a test" option of the candidate notification.
pub const CREATE_TEST_COMMAND: &str = "test:createTest";
