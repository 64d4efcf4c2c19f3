#[cfg(test)]
mod tests {
    use std::process::{Command, Output};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Runs the binary from an empty directory so no `.env` is picked up.
    struct CliTestContext {
        temp_dir: TempDir,
    }

    impl CliTestContext {
        fn run(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
            let mut cmd = Command::new(env!("CARGO_BIN_EXE_focuswarden"));
            cmd.args(args).current_dir(self.temp_dir.path());
            for var in ["API_ENDPOINT", "EMAIL_PASSWORD", "FOCUS_SUBJECT", "RUST_LOG", "FOCUSWARDEN_DEBUG"] {
                cmd.env_remove(var);
            }
            cmd.envs(envs.iter().copied());
            cmd.output().expect("Failed to run focuswarden")
        }
    }

    impl TestContext for CliTestContext {
        fn setup() -> Self {
            CliTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    #[test_context(CliTestContext)]
    #[test]
    fn test_config_prints_masked_json(ctx: &mut CliTestContext) {
        let output = ctx.run(&["config"], &[("EMAIL_PASSWORD", "app-password"), ("FOCUS_SUBJECT", "Sam")]);
        assert!(output.status.success());

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(json["mail"]["password"], "********");
        assert_eq!(json["mail"]["subject_name"], "Sam");
        assert_eq!(json["monitor"]["poll_interval"], 500);
    }

    #[test_context(CliTestContext)]
    #[test]
    fn test_classify_without_endpoint_fails(ctx: &mut CliTestContext) {
        let output = ctx.run(&["classify", "YouTube"], &[]);
        assert!(!output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("API_ENDPOINT"));
    }

    #[test_context(CliTestContext)]
    #[test]
    fn test_no_arguments_shows_help(ctx: &mut CliTestContext) {
        let output = ctx.run(&[], &[]);
        assert!(!output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("watch"));
        assert!(stderr.contains("ports"));
    }
}
