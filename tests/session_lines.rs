use esh::aliases::{default_table, Aliases, JsonAliasStore, MemoryAliasStore};
use esh::errors::ShellError;
use esh::session::Session;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn session() -> Session<MemoryAliasStore> {
    let aliases = Aliases::load(MemoryAliasStore::new(default_table())).unwrap();
    Session::new(PathBuf::from("/nonexistent-home"), aliases)
}

fn run(session: &mut Session<MemoryAliasStore>, line: &str) -> Vec<ShellError> {
    let mut out = Vec::new();
    session.handle_line(line, &mut out).errors
}

#[test]
fn redirection_to_file() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("f");
    let mut session = session();

    assert!(run(&mut session, &format!("echo hello > {}", f.display())).is_empty());
    assert!(run(&mut session, &format!("echo hello > {}", f.display())).is_empty());
    assert_eq!(fs::read_to_string(&f).unwrap(), "hello\n");

    assert!(run(&mut session, &format!("echo hello >> {}", f.display())).is_empty());
    assert_eq!(fs::read_to_string(&f).unwrap(), "hello\nhello\n");
}

#[test]
fn redirection_only_stage_truncates() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("f");
    fs::write(&f, "old contents\n").unwrap();

    assert!(run(&mut session(), &format!("> {}", f.display())).is_empty());
    assert_eq!(fs::metadata(&f).unwrap().len(), 0);
}

#[test]
fn append_only_stage_touches() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("touched");

    assert!(run(&mut session(), &format!(">> {}", f.display())).is_empty());
    assert!(f.exists());
    assert_eq!(fs::metadata(&f).unwrap().len(), 0);
}

#[test]
fn last_redirection_applies_to_final_stage() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("f");

    let line = format!("echo one two > {} | wc -w", f.display());
    assert!(run(&mut session(), &line).is_empty());
    assert_eq!(fs::read_to_string(&f).unwrap().trim(), "2");
}

#[test]
fn alias_substitutes_exact_stage_only() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("f");
    let mut session = session();

    let define = format!("alias save=echo saved > {}", f.display());
    assert!(run(&mut session, &define).is_empty());

    assert!(run(&mut session, "save").is_empty());
    assert_eq!(fs::read_to_string(&f).unwrap(), "saved\n");

    let errors = run(&mut session, "save extra");
    assert!(matches!(errors.as_slice(), [ShellError::CommandNotFound(name)] if name == "save"));
}

#[test]
fn builtin_stage_is_excluded_from_pipeline() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("f");
    let mut session = session();

    let line = format!("alias zz=echo z | echo only > {}", f.display());
    assert!(run(&mut session, &line).is_empty());
    assert_eq!(fs::read_to_string(&f).unwrap(), "only\n");
    assert_eq!(
        session.aliases().table().get("zz").map(String::as_str),
        Some("echo z")
    );
}

#[test]
fn missing_redirection_target_is_an_input_error() {
    let errors = run(&mut session(), "echo hi >");
    assert!(matches!(errors.as_slice(), [ShellError::MissingRedirectTarget]));
}

#[test]
fn alias_definitions_survive_reload() {
    let home = TempDir::new().unwrap();
    let store = JsonAliasStore::in_home(home.path());
    store.ensure_exists().unwrap();

    let mut session = Session::new(
        home.path().to_path_buf(),
        Aliases::load(store.clone()).unwrap(),
    );
    let mut out = Vec::new();
    assert!(session.handle_line("alias gl=git log", &mut out).errors.is_empty());

    let reloaded = Aliases::load(store).unwrap();
    assert_eq!(reloaded.resolve("gl"), "git log");
    assert_eq!(reloaded.resolve("ll"), "ls -la");
}

#[test]
fn tilde_expands_in_external_stages() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("notes"), "from home\n").unwrap();
    let out = home.path().join("out");

    let mut session = Session::new(
        home.path().to_path_buf(),
        Aliases::load(MemoryAliasStore::default()).unwrap(),
    );
    let mut sink = Vec::new();

    let line = format!("cat ~/notes | tr a-z A-Z > {}", out.display());
    assert!(session.handle_line(&line, &mut sink).errors.is_empty());
    assert_eq!(fs::read_to_string(&out).unwrap(), "FROM HOME\n");

    assert!(session.handle_line("echo ~ >> ~/out", &mut sink).errors.is_empty());
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        format!("FROM HOME\n{}\n", home.path().display())
    );
}
