use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("cadastro_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn db(&self) -> String {
        self.join("cadastro.db").to_str().unwrap().to_string()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Runs the binary with `args`, feeding `stdin` and isolating it from the
/// caller's environment.
fn cadastro(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cadastro"))
        .args(args)
        .env_remove("CADASTRO_CONFIG")
        .env_remove("CADASTRO_DB")
        .env_remove("CADASTRO_PREFIX")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run cadastro");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for cadastro")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn register(db: &str, script: &str) -> Output {
    cadastro(&["--db", db, "register"], script)
}

// ---------------------------------------------------------------------------
// register
// ---------------------------------------------------------------------------

#[test]
fn register_retries_then_lists() {
    let dir = TempDir::new("register_retries");
    let out = register(&dir.db(), "\nAlice\nabc\n30\n111.111.111-11\n");

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Invalid name. Try again."));
    assert!(text.contains("Could not read age 'abc'. Try again."));
    assert!(text.contains("Alice registered successfully"));
    assert!(text.contains("1 = Alice. 30 years old. CPF 11111111111"));
}

#[test]
fn register_is_default_command() {
    let dir = TempDir::new("register_default");
    let out = cadastro(&["--db", &dir.db()], "Bob\n25\n22222222222\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Bob registered successfully"));
}

#[test]
fn register_rejects_known_cpf() {
    let dir = TempDir::new("register_duplicate");
    let db = dir.db();
    assert!(register(&db, "Ana\n20\n11111111111\n").status.success());

    let out = register(&db, "Bia\n21\n111.111.111-11\n22222222222\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("CPF 11111111111 is already registered"));
    assert!(text.contains("1 = Ana. 20 years old. CPF 11111111111"));
    assert!(text.contains("2 = Bia. 21 years old. CPF 22222222222"));
}

#[test]
fn register_fails_when_input_ends() {
    let dir = TempDir::new("register_eof");
    let out = register(&dir.db(), "Bob\n");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("input closed while reading age"));
}

#[test]
fn register_honors_max_attempts() {
    let dir = TempDir::new("register_max_attempts");
    let out = cadastro(
        &["--db", &dir.db(), "register", "--max-attempts", "2"],
        "\n\nAlice\n30\n1\n",
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("gave up reading name after 2 invalid entries"));
}

// ---------------------------------------------------------------------------
// list / check / show
// ---------------------------------------------------------------------------

#[test]
fn list_empty_registry() {
    let dir = TempDir::new("list_empty");
    let out = cadastro(&["--db", &dir.db(), "list"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "No records found.\n");
}

#[test]
fn list_json_output() {
    let dir = TempDir::new("list_json");
    let db = dir.db();
    assert!(register(&db, "Ana\n20\n1\n").status.success());
    assert!(register(&db, "Bia\n21\n2\n").status.success());

    let out = cadastro(&["--db", &db, "list", "--format", "json"], "");
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["name"], "Ana");
    assert_eq!(rows[1]["national_id"], "2");
}

#[test]
fn check_reports_registration() {
    let dir = TempDir::new("check");
    let db = dir.db();
    assert!(register(&db, "Ana\n20\n12345678909\n").status.success());

    let out = cadastro(&["--db", &db, "check", "123.456.789-09"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "CPF 12345678909 is registered (id 1).\n");

    let out = cadastro(&["--db", &db, "check", "98765432100"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "CPF 98765432100 is not registered.\n");

    let out = cadastro(&["--db", &db, "check", "abc"], "");
    assert!(!out.status.success());
}

#[test]
fn show_record_and_missing_id() {
    let dir = TempDir::new("show");
    let db = dir.db();
    assert!(register(&db, "Ana\n20\n1\n").status.success());

    let out = cadastro(&["--db", &db, "show", "1"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "1 = Ana. 20 years old. CPF 1\n");

    let out = cadastro(&["--db", &db, "show", "42"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("No record with id 42"));
}

// ---------------------------------------------------------------------------
// migrate / config
// ---------------------------------------------------------------------------

#[test]
fn migrate_lifecycle() {
    let dir = TempDir::new("migrate");
    let db = dir.db();

    let out = cadastro(&["--db", &db, "migrate", "status"], "");
    assert!(out.status.success());
    assert!(stdout(&out).contains("Table exists: no"));

    assert!(cadastro(&["--db", &db, "migrate", "up"], "").status.success());
    assert!(register(&db, "Ana\n20\n1\n").status.success());

    let out = cadastro(&["--db", &db, "migrate", "status"], "");
    assert!(stdout(&out).contains("Table exists: yes"));
    assert!(stdout(&out).contains("Record count: 1"));

    assert!(cadastro(&["--db", &db, "migrate", "down"], "").status.success());
    let out = cadastro(&["--db", &db, "migrate", "status"], "");
    assert!(stdout(&out).contains("Table exists: no"));
}

#[test]
fn invalid_prefix_is_rejected() {
    let dir = TempDir::new("bad_prefix");
    let out = cadastro(&["--db", &dir.db(), "--prefix", "x;--", "list"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).starts_with("error: "));
    assert!(stderr(&out).contains("invalid prefix"));
}

#[test]
fn config_file_selects_database_and_prefix() {
    let dir = TempDir::new("config_file");
    let config = dir.join("cadastro.yml");
    let db = dir.join("from_config.db");
    fs::write(
        &config,
        format!("database: {}\nprefix: cfg_\n", db.to_str().unwrap()),
    )
    .unwrap();

    let out = cadastro(
        &["--config", config.to_str().unwrap(), "register"],
        "Ana\n20\n1\n",
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(db.exists());

    let out = cadastro(
        &["--config", config.to_str().unwrap(), "migrate", "status"],
        "",
    );
    assert!(stdout(&out).contains("Record count: 1"));

    // A different prefix on the command line sees an empty registry.
    let out = cadastro(
        &["--config", config.to_str().unwrap(), "--prefix", "other_", "list"],
        "",
    );
    assert_eq!(stdout(&out), "No records found.\n");
}

#[test]
fn init_config_writes_effective_settings() {
    let dir = TempDir::new("init_config");
    let path = dir.join("out.yml");
    let out = cadastro(
        &[
            "--db",
            "people.db",
            "--prefix",
            "p_",
            "init-config",
            "--output",
            path.to_str().unwrap(),
        ],
        "",
    );
    assert!(out.status.success());
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("database: people.db"));
    assert!(written.contains("prefix: p_"));
}
