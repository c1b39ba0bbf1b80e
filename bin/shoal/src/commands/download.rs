use std::path::PathBuf;

use clap::Args;
use eyre::{bail, WrapErr};
use shoal_rpc::peer::DownloadFileRequest;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tonic::{Code, Status};

use super::{connect_peer, ping_peer};

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// address:port of the peer to download from.
    #[arg(long, value_name = "ADDR")]
    pub peer: String,

    /// Name of the file to download.
    #[arg(long)]
    pub filename: String,

    /// Directory the downloaded file is written into.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub out_dir: PathBuf,
}

pub async fn run(args: DownloadArgs) -> eyre::Result<()> {
    let mut client = connect_peer(&args.peer).await?;
    ping_peer(&mut client).await?;

    let mut stream = match client
        .download_file(DownloadFileRequest {
            file_name: args.filename.clone(),
        })
        .await
    {
        Ok(resp) => resp.into_inner(),
        Err(status) => bail!(describe_failure(&status, &args.filename)),
    };

    tokio::fs::create_dir_all(&args.out_dir)
        .await
        .wrap_err_with(|| format!("failed to create {}", args.out_dir.display()))?;
    let path = args.out_dir.join(&args.filename);
    let file = File::create(&path)
        .await
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    loop {
        match stream.message().await {
            Ok(Some(chunk)) => {
                writer.write_all(&chunk.data).await.wrap_err("write")?;
                println!("downloaded[{}/{}]", chunk.chunk_number, chunk.total_chunks);
            }
            Ok(None) => {
                writer.flush().await.wrap_err("flush")?;
                break;
            }
            Err(status) => {
                // Do not leave a partial destination behind.
                drop(writer);
                let _ = tokio::fs::remove_file(&path).await;
                bail!(describe_failure(&status, &args.filename));
            }
        }
    }

    Ok(())
}

fn describe_failure(status: &Status, filename: &str) -> String {
    if status.code() == Code::NotFound {
        format!("file [{filename}] not found in network")
    } else {
        format!("download failed: {}", status.message())
    }
}
