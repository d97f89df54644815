// crates/client/examples/fetch_json.rs
//! Foreground and background request example showing basic usage

use std::path::Path;
use std::sync::Arc;

use courier_client::{
    decode_download, BackgroundSession, Client as _, ApiClient, DownloadTask, SessionDelegate,
};
use courier_endpoint::RequestTemplate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Echo {
    url: String,
}

struct PrintingDelegate {
    done: tokio::sync::mpsc::UnboundedSender<(BackgroundSession, DownloadTask, std::path::PathBuf)>,
}

impl SessionDelegate for PrintingDelegate {
    fn finished_downloading(
        &self,
        session: &BackgroundSession,
        task: &DownloadTask,
        location: &Path,
    ) {
        println!("📦 task {} finished at {}", task.task_id, location.display());
        let _ = self.done.send((session.clone(), task.clone(), location.to_path_buf()));
    }

    fn wrote_data(&self, _session_id: &str, task_id: u64, downloaded: u64, total: Option<u64>) {
        match total {
            Some(total) => println!("  task {task_id}: {downloaded}/{total} bytes"),
            None => println!("  task {task_id}: {downloaded} bytes"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🌐 Foreground request\n");

    let endpoint = RequestTemplate::new("httpbin.org".to_string(), "/get".to_string());
    match ApiClient.request::<Echo>(&endpoint).await {
        Ok(echo) => println!("✅ decoded response for {}", echo.url),
        Err(e) => eprintln!("❌ request failed: {}", e),
    }

    println!("\n🌐 Background download\n");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let session = BackgroundSession::new(
        "example-session".to_string(),
        Arc::new(PrintingDelegate { done: tx }),
    )?;
    session.submit(&RequestTemplate::new("httpbin.org".to_string(), "/get".to_string()));

    if let Some((session, task, location)) = rx.recv().await {
        let echo: Echo = decode_download(&session, &task, &location).await?;
        println!("✅ decoded downloaded payload for {}", echo.url);
    }

    Ok(())
}
