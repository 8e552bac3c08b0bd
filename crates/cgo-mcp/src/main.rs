use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cgo_core::bucket::{self, ItemRef};
use cgo_core::markdown::to_markdown;
use cgo_core::quota::{QuotaPolicy, RequestLimiter};
use cgo_core::session::{Session, SessionSnapshot};
use cgo_core::settings::read_settings;
use cgo_core::storage::{default_data_dir, FileQuotaStore, SessionStore};
use cgo_core::{heuristic, Bucket, Locale};
use cgo_suggest::{prompt, Engine, Source};

// --- Command line ---

/// MCP server exposing the CGO task board as tools.
#[derive(Debug, Parser)]
#[command(name = "cgo-mcp")]
#[command(version)]
struct Cli {
    /// Directory for session, quota and settings files (default ~/.cgo)
    #[arg(long, env = "CGO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Development mode: no daily quota
    #[arg(long, env = "CGO_DEVELOPMENT")]
    development: bool,

    /// Never call the remote model
    #[arg(long, env = "CGO_LOCAL_ONLY")]
    local_only: bool,

    /// Timeout for one remote classification, in seconds
    #[arg(long, env = "CGO_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register cgo-mcp with Claude Code and/or Codex in the current directory
    Init,
}

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ClassifyRequest {
    /// Task lines to classify, one task per entry
    tasks: Vec<String>,
    /// Prompt language, "ko" (default) or "en"
    language: Option<Locale>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct OrganizeRequest {
    /// New input text, one task per line. Omit to reuse the saved input.
    text: Option<String>,
    /// Switch the session language before organizing
    language: Option<Locale>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct MoveTaskRequest {
    /// Key of the task to move, e.g. "core-2"
    key: String,
    /// Target bucket
    to: Bucket,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ReorderTaskRequest {
    /// Bucket to reorder
    bucket: Bucket,
    /// Key of the task to move, e.g. "growth-3"
    from: String,
    /// Key of the slot to move it to, e.g. "growth-0"
    to: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct TaskKeyRequest {
    /// Key of the task, e.g. "optional-1"
    key: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct UpdateTaskRequest {
    /// Key of the task, e.g. "core-0"
    key: String,
    /// Replacement text
    text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct RubricRequest {
    /// "ko" or "en". Defaults to the session language.
    language: Option<Locale>,
}

// --- Server ---

#[derive(Clone)]
pub struct CgoServer {
    tool_router: ToolRouter<Self>,
    store: SessionStore,
    engine: Engine,
    limiter: Arc<Mutex<RequestLimiter<FileQuotaStore>>>,
    /// Serializes every load-modify-save of the session file.
    session_lock: Arc<Mutex<()>>,
}

fn text_result(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

fn error_result(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(text.into())]))
}

fn json_result(value: &Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("Serialization error: {}", e));
    text_result(text)
}

/// Snapshot as tool output: every task with the key that addresses it now.
fn listing(snapshot: &SessionSnapshot) -> Value {
    let mut buckets = serde_json::Map::new();
    for b in Bucket::ALL {
        let items: Vec<Value> = snapshot
            .buckets
            .get(b)
            .iter()
            .enumerate()
            .map(|(i, text)| json!({ "key": ItemRef::new(b, i).key(), "text": text }))
            .collect();
        buckets.insert(b.as_str().to_string(), Value::Array(items));
    }
    json!({
        "buckets": buckets,
        "dailyFocus": snapshot.daily_focus,
        "inputText": snapshot.input_text,
        "language": snapshot.language,
        "hasOrganized": snapshot.has_organized,
    })
}

fn parse_key(key: &str) -> Result<ItemRef, String> {
    ItemRef::parse(key).ok_or_else(|| {
        format!("'{key}' is not a task key. Use list_tasks to get keys like \"core-0\".")
    })
}

#[tool_router]
impl CgoServer {
    pub fn new(store: SessionStore, engine: Engine, limiter: RequestLimiter<FileQuotaStore>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            store,
            engine,
            limiter: Arc::new(Mutex::new(limiter)),
            session_lock: Arc::new(Mutex::new(())),
        }
    }

    fn load(&self) -> SessionSnapshot {
        self.store.load().unwrap_or_default()
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), String> {
        self.store
            .save(snapshot)
            .map_err(|e| format!("Failed to save session: {e}"))
    }

    /// Apply a positional edit to the saved session and report the result.
    async fn edit(
        &self,
        transform: impl FnOnce(&cgo_core::Buckets) -> cgo_core::Buckets,
    ) -> Result<CallToolResult, McpError> {
        let _lock = self.session_lock.lock().await;
        let mut snapshot = self.load();
        let changed = snapshot.apply(transform);
        if changed {
            if let Err(e) = self.save(&snapshot) {
                return error_result(e);
            }
        }
        json_result(&json!({ "changed": changed, "session": listing(&snapshot) }))
    }

    #[tool(
        description = "List the current task board. Returns {buckets: {core, growth, optional: [{key, text}]}, dailyFocus: [{priority, task}], inputText, language, hasOrganized}. Keys like \"core-2\" address a task by position and shift after every edit, so list again before the next edit."
    )]
    async fn list_tasks(&self) -> Result<CallToolResult, McpError> {
        let _lock = self.session_lock.lock().await;
        json_result(&listing(&self.load()))
    }

    #[tool(
        description = "Classify task lines into core/growth/optional without touching the board. Uses the configured model, or the keyword rules when the model is unavailable or fails. Returns {core, growth, optional, dailyFocus, source, fallbackReason?}."
    )]
    async fn classify_tasks(
        &self,
        Parameters(req): Parameters<ClassifyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let language = req.language.unwrap_or_default();
        match self.engine.classify_or_fallback(&req.tasks, language).await {
            Ok(classified) => {
                let mut value = serde_json::to_value(&classified.result)
                    .unwrap_or_else(|_| json!({}));
                value["source"] = json!(classified.source);
                if let Some(e) = &classified.failure {
                    value["fallbackReason"] = json!(e.kind());
                }
                json_result(&value)
            }
            Err(e) => error_result(e.to_string()),
        }
    }

    #[tool(
        description = "Organize the session input into the board, replacing the current board. Optionally set new input text and language first. Remote model calls count against the daily quota; on model failure the keyword rules are used and nothing is counted."
    )]
    async fn organize_tasks(
        &self,
        Parameters(req): Parameters<OrganizeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let _lock = self.session_lock.lock().await;
        let mut session = Session::from_snapshot(self.load());
        let edited = req.text.is_some() || req.language.is_some();
        if let Some(text) = req.text {
            session.set_input(text);
        }
        if let Some(language) = req.language {
            session.set_language(language);
        }
        // the new input survives a denied or failed organize
        if edited {
            if let Err(e) = self.save(&session.snapshot()) {
                return error_result(e);
            }
        }

        let lines = session.lines();
        if lines.is_empty() {
            return error_result("Nothing to organize: the input is empty. Pass `text` with one task per line.");
        }

        if self.engine.is_remote() {
            let decision = self.limiter.lock().await.can_make_request();
            if !decision.allowed {
                info!(reason = ?decision.reason, "quota denied");
                let detail = json!({
                    "error": "request limit reached",
                    "reason": decision.reason,
                    "remaining": decision.remaining,
                });
                return error_result(detail.to_string());
            }
        }

        let classified = match self
            .engine
            .classify_or_fallback(&lines, session.language())
            .await
        {
            Ok(c) => c,
            Err(e) => return error_result(e.to_string()),
        };

        if classified.source == Source::Model {
            if let Err(e) = self.limiter.lock().await.increment_request_count() {
                warn!(error = %e, "failed to record quota usage");
            }
        }

        session.organize(classified.result);
        let snapshot = session.snapshot();
        if let Err(e) = self.save(&snapshot) {
            return error_result(e);
        }

        let mut value = listing(&snapshot);
        value["source"] = json!(classified.source);
        if let Some(e) = &classified.failure {
            value["fallbackReason"] = json!(e.kind());
        }
        json_result(&value)
    }

    #[tool(description = "Move a task to the end of another bucket")]
    async fn move_task(
        &self,
        Parameters(req): Parameters<MoveTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let from = match parse_key(&req.key) {
            Ok(r) => r.bucket,
            Err(e) => return error_result(e),
        };
        self.edit(|b| bucket::move_item(b, from.as_str(), req.to.as_str(), &req.key))
            .await
    }

    #[tool(
        description = "Reorder a task within one bucket: the task at `from` is taken out and inserted at the index of `to`"
    )]
    async fn reorder_task(
        &self,
        Parameters(req): Parameters<ReorderTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        for key in [&req.from, &req.to] {
            if let Err(e) = parse_key(key) {
                return error_result(e);
            }
        }
        self.edit(|b| bucket::reorder(b, req.bucket.as_str(), &req.from, &req.to))
            .await
    }

    #[tool(description = "Delete a task from the board")]
    async fn delete_task(
        &self,
        Parameters(req): Parameters<TaskKeyRequest>,
    ) -> Result<CallToolResult, McpError> {
        if let Err(e) = parse_key(&req.key) {
            return error_result(e);
        }
        self.edit(|b| bucket::remove(b, &req.key)).await
    }

    #[tool(description = "Replace the text of a task, keeping its position")]
    async fn update_task(
        &self,
        Parameters(req): Parameters<UpdateTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        if let Err(e) = parse_key(&req.key) {
            return error_result(e);
        }
        let text = req.text.trim();
        if text.is_empty() {
            return error_result("Task text must not be empty. Use delete_task to remove a task.");
        }
        self.edit(|b| bucket::update(b, &req.key, text)).await
    }

    #[tool(description = "Export the board as a Markdown checklist, one section per bucket")]
    async fn export_markdown(&self) -> Result<CallToolResult, McpError> {
        let _lock = self.session_lock.lock().await;
        let snapshot = self.load();
        text_result(to_markdown(&snapshot.buckets, snapshot.language))
    }

    #[tool(
        description = "Get the classification rubric: bucket criteria, worked examples and rules, as sent to the model"
    )]
    async fn get_rubric(
        &self,
        Parameters(req): Parameters<RubricRequest>,
    ) -> Result<CallToolResult, McpError> {
        let language = match req.language {
            Some(l) => l,
            None => {
                let _lock = self.session_lock.lock().await;
                self.load().language
            }
        };
        text_result(prompt::system_prompt(language))
    }

    #[tool(description = "Preview how the keyword rules would classify task lines, with per-line scores")]
    async fn explain_rules(
        &self,
        Parameters(req): Parameters<ClassifyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let lines: Vec<Value> = req
            .tasks
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| {
                let s = heuristic::score(line);
                json!({
                    "task": line,
                    "bucket": heuristic::classify_line(line),
                    "entertainment": heuristic::is_strong_entertainment(line),
                    "scores": { "core": s.core, "growth": s.growth, "optional": s.optional },
                })
            })
            .collect();
        json_result(&Value::Array(lines))
    }

    #[tool(description = "Clear the board, Daily Focus and input. The language is kept.")]
    async fn reset_session(&self) -> Result<CallToolResult, McpError> {
        let _lock = self.session_lock.lock().await;
        let mut session = Session::from_snapshot(self.load());
        session.reset();
        let snapshot = session.snapshot();
        if let Err(e) = self.save(&snapshot) {
            return error_result(e);
        }
        json_result(&listing(&snapshot))
    }
}

const INSTRUCTIONS: &str = r#"CGO sorts a todo list into three buckets:
- core: work tied directly to today's output (presentations, demos, reports, customer replies, deadlines, launches)
- growth: long-term investment (learning, docs, refactoring, exercise, reading). Ambiguous tasks land here.
- optional: entertainment, brainstorming and experiments

Typical use:
1. `organize_tasks` with the user's list as `text` (one task per line).
2. `list_tasks` to see the board and task keys.
3. Edit with `move_task`, `reorder_task`, `update_task`, `delete_task`. Keys are positional: list again after each edit.
4. `export_markdown` for a checklist.

Daily Focus is the first three tasks of core, then growth, and updates after every edit."#;

#[tool_handler]
impl ServerHandler for CgoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Init) = cli.command {
        return init_project();
    }

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cgo_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let settings = read_settings(&dir).with_env();
    let engine = Engine::configure(
        settings,
        cli.local_only,
        Duration::from_secs(cli.request_timeout_secs),
    );
    let policy = if cli.development {
        QuotaPolicy::development()
    } else {
        QuotaPolicy::production()
    };
    let limiter = RequestLimiter::new(policy, FileQuotaStore::new(&dir));

    info!(data_dir = %dir.display(), engine = engine.name(), "starting cgo-mcp");

    let service = CgoServer::new(SessionStore::new(&dir), engine, limiter)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {}", e))?;
    service.waiting().await?;
    Ok(())
}

type InitResult = Result<(), Box<dyn std::error::Error>>;

/// An agent CLI that can load cgo-mcp from a project-local config file.
struct AgentCli {
    binary: &'static str,
    label: &'static str,
    register: fn(&Path, &str) -> InitResult,
}

const AGENT_CLIS: [AgentCli; 2] = [
    AgentCli {
        binary: "claude",
        label: "Claude Code",
        register: init_claude_code,
    },
    AgentCli {
        binary: "codex",
        label: "Codex",
        register: init_codex,
    },
];

/// `cgo-mcp init`: register this binary with every supported agent CLI
/// found on `PATH`, writing config into the current directory.
fn init_project() -> InitResult {
    let binary_path = std::env::current_exe()?
        .canonicalize()?
        .to_string_lossy()
        .into_owned();
    let cwd = std::env::current_dir()?;
    let path_var = std::env::var_os("PATH").unwrap_or_default();

    let found: Vec<&AgentCli> = AGENT_CLIS
        .iter()
        .filter(|cli| on_path(&path_var, cli.binary))
        .collect();
    if found.is_empty() {
        let names: Vec<&str> = AGENT_CLIS.iter().map(|cli| cli.binary).collect();
        return Err(format!("none of {} found in PATH", names.join(", ")).into());
    }

    for cli in &found {
        (cli.register)(&cwd, &binary_path)?;
    }

    let labels: Vec<&str> = found.iter().map(|cli| cli.label).collect();
    eprintln!("\n{} will start cgo-mcp in this project.", labels.join(" and "));
    Ok(())
}

fn on_path(path_var: &std::ffi::OsStr, binary: &str) -> bool {
    std::env::split_paths(path_var).any(|dir| {
        dir.join(binary).is_file() || dir.join(format!("{binary}.exe")).is_file()
    })
}

/// Merge a `cgo` entry into `.mcp.json`.
fn init_claude_code(cwd: &Path, binary_path: &str) -> InitResult {
    let path = cwd.join(".mcp.json");
    let existing = std::fs::read_to_string(&path).ok();
    let updated = merge_mcp_json(existing.as_deref(), binary_path)?;
    std::fs::write(&path, updated)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn merge_mcp_json(existing: Option<&str>, binary_path: &str) -> Result<String, serde_json::Error> {
    let mut root: Value = existing
        .and_then(|s| serde_json::from_str(s).ok())
        .filter(Value::is_object)
        .unwrap_or_else(|| json!({}));

    if !root.get("mcpServers").is_some_and(|v| v.is_object()) {
        root["mcpServers"] = json!({});
    }
    root["mcpServers"]["cgo"] = json!({
        "type": "stdio",
        "command": binary_path,
        "args": [],
    });
    serde_json::to_string_pretty(&root)
}

/// Merge a `cgo` entry into `.codex/config.toml`.
fn init_codex(cwd: &Path, binary_path: &str) -> InitResult {
    let codex_dir = cwd.join(".codex");
    let path = codex_dir.join("config.toml");
    let existing = std::fs::read_to_string(&path).ok();

    std::fs::create_dir_all(&codex_dir)?;
    std::fs::write(&path, merge_codex_toml(existing.as_deref(), binary_path))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn merge_codex_toml(existing: Option<&str>, binary_path: &str) -> String {
    let mut doc: toml_edit::DocumentMut = existing
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    if !doc.contains_table("mcp_servers") {
        doc["mcp_servers"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    let mut server = toml_edit::Table::new();
    server.insert("command", toml_edit::value(binary_path));
    server.insert("args", toml_edit::value(toml_edit::Array::new()));
    doc["mcp_servers"]["cgo"] = toml_edit::Item::Table(server);
    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(dir: &std::path::Path) -> CgoServer {
        let limiter = RequestLimiter::new(QuotaPolicy::production(), FileQuotaStore::new(dir));
        CgoServer::new(SessionStore::new(dir), Engine::Local, limiter)
    }

    fn body(result: CallToolResult) -> Value {
        let text = result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap();
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }

    fn texts(listing: &Value, bucket: &str) -> Vec<String> {
        listing["buckets"][bucket]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["text"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn listing_carries_positional_keys() {
        let snapshot = SessionSnapshot {
            buckets: cgo_core::Buckets {
                core: vec!["a".into(), "b".into()],
                growth: vec![],
                optional: vec!["c".into()],
            },
            ..SessionSnapshot::default()
        };
        let v = listing(&snapshot);
        assert_eq!(v["buckets"]["core"][1]["key"], "core-1");
        assert_eq!(v["buckets"]["optional"][0]["key"], "optional-0");
        assert_eq!(v["language"], "ko");
    }

    #[tokio::test]
    async fn organize_and_edit_through_tools() {
        let dir = tempfile::tempdir().unwrap();
        let s = server(dir.path());

        let out = s
            .organize_tasks(Parameters(OrganizeRequest {
                text: Some("weekly report\nread book\nwatch netflix".into()),
                language: Some(Locale::En),
            }))
            .await
            .unwrap();
        let v = body(out);
        assert_eq!(v["source"], "rules");
        assert_eq!(texts(&v, "core"), vec!["weekly report"]);
        assert_eq!(v["dailyFocus"].as_array().unwrap().len(), 2);

        let out = s
            .move_task(Parameters(MoveTaskRequest {
                key: "core-0".into(),
                to: Bucket::Optional,
            }))
            .await
            .unwrap();
        let v = body(out);
        assert_eq!(v["changed"], true);
        assert_eq!(texts(&v["session"], "optional"), vec!["watch netflix", "weekly report"]);
        assert_eq!(v["session"]["dailyFocus"][0]["task"], "read book");

        let out = s
            .delete_task(Parameters(TaskKeyRequest {
                key: "growth-5".into(),
            }))
            .await
            .unwrap();
        assert_eq!(body(out)["changed"], false);

        let out = s.export_markdown().await.unwrap();
        assert_eq!(
            body(out),
            Value::String(
                "## Core\n\n\n\n## Growth\n\n- [ ] read book\n\n## Optional\n\n- [ ] watch netflix\n- [ ] weekly report"
                    .into()
            )
        );

        let out = s.reset_session().await.unwrap();
        let v = body(out);
        assert_eq!(v["language"], "en");
        assert!(texts(&v, "growth").is_empty());
    }

    #[tokio::test]
    async fn denied_organize_keeps_the_new_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut limiter = RequestLimiter::new(
            QuotaPolicy::production().with_daily_limit(1),
            FileQuotaStore::new(dir.path()),
        );
        limiter.increment_request_count().unwrap();
        let model = cgo_suggest::LlmEngine::new(cgo_core::settings::AiSettings {
            provider: "ollama".into(),
            api_key: String::new(),
            model: "m".into(),
        })
        .unwrap();
        let s = CgoServer::new(
            SessionStore::new(dir.path()),
            Engine::Remote(Arc::new(model)),
            limiter,
        );

        let out = s
            .organize_tasks(Parameters(OrganizeRequest {
                text: Some("customer demo\nread book".into()),
                language: Some(Locale::En),
            }))
            .await
            .unwrap();
        assert_eq!(out.is_error, Some(true));
        assert!(body(out).to_string().contains("daily_limit_exceeded"));

        let v = body(s.list_tasks().await.unwrap());
        assert_eq!(v["inputText"], "customer demo\nread book");
        assert_eq!(v["language"], "en");
        assert_eq!(v["hasOrganized"], false);
    }

    #[tokio::test]
    async fn bad_keys_are_tool_errors() {
        let dir = tempfile::tempdir().unwrap();
        let s = server(dir.path());
        let out = s
            .update_task(Parameters(UpdateTaskRequest {
                key: "later-0".into(),
                text: "x".into(),
            }))
            .await
            .unwrap();
        assert_eq!(out.is_error, Some(true));
    }

    #[tokio::test]
    async fn empty_input_is_a_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let s = server(dir.path());
        let out = s
            .organize_tasks(Parameters(OrganizeRequest {
                text: None,
                language: None,
            }))
            .await
            .unwrap();
        assert_eq!(out.is_error, Some(true));
    }

    #[test]
    fn agent_clis_are_found_on_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("codex"), "").unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert!(on_path(&path_var, "codex"));
        assert!(!on_path(&path_var, "claude"));
        assert!(!on_path(std::ffi::OsStr::new(""), "codex"));
    }

    #[test]
    fn init_merges_into_existing_configs() {
        let json = merge_mcp_json(Some(r#"{"mcpServers":{"other":{"command":"x"}}}"#), "/bin/cgo-mcp")
            .unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["mcpServers"]["other"]["command"], "x");
        assert_eq!(v["mcpServers"]["cgo"]["command"], "/bin/cgo-mcp");

        let toml = merge_codex_toml(Some("model = \"o3\"\n"), "/bin/cgo-mcp");
        assert!(toml.contains("model = \"o3\""));
        assert!(toml.contains("[mcp_servers.cgo]"));
        assert!(toml.contains("command = \"/bin/cgo-mcp\""));
    }
}
