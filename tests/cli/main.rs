use std::{
    fs,
    io::Read as _,
    path::{Path, PathBuf},
    process::Command,
    thread,
    time::Duration,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;
use tiny_http::{Response, Server};

mod extract;
mod init;

const BIN_NAME: &str = "txcontext";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop config discovery at the project root.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn extract_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("extract");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Local stand-in for the Messages API.
///
/// Every request is answered by `reply`, given the request body. The server
/// stops after five seconds without a request; joining the handle returns the
/// number of requests served.
pub struct FakeLlm {
    pub url: String,
    handle: thread::JoinHandle<usize>,
}

impl FakeLlm {
    pub fn start(reply: fn(&str) -> (u16, String)) -> Result<Self> {
        let server = Server::http("127.0.0.1:0").map_err(|e| anyhow::anyhow!(e))?;
        let addr = server
            .server_addr()
            .to_ip()
            .context("Server is not bound to an IP address")?;

        let handle = thread::spawn(move || {
            let mut served = 0;
            while let std::result::Result::Ok(Some(mut request)) =
                server.recv_timeout(Duration::from_secs(5))
            {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let (status, text) = reply(&body);
                let _ = request.respond(Response::from_string(text).with_status_code(status));
                served += 1;
            }
            served
        });

        Ok(Self {
            url: format!("http://{}", addr),
            handle,
        })
    }

    pub fn requests(self) -> usize {
        self.handle.join().unwrap_or(0)
    }
}

/// Messages API body whose text is a context JSON object.
pub fn llm_reply(description: &str) -> String {
    let context = serde_json::json!({
        "description": description,
        "ui_element": "label",
        "tone": "neutral",
    });
    serde_json::json!({
        "content": [{ "type": "text", "text": context.to_string() }]
    })
    .to_string()
}
