use std::path::PathBuf;

use clap::Args;
use eyre::{bail, eyre, WrapErr};
use shoal_primitives::total_chunks;
use shoal_rpc::peer::UploadFileChunk;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::{connect_peer, ping_peer};

/// Upload-side chunk size; independent of the peers' download chunk size.
const UPLOAD_CHUNK_SIZE: u64 = 512 * 1024;

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// address:port of the peer to upload to.
    #[arg(long, value_name = "ADDR")]
    pub peer: String,

    /// Path of the local file to upload; its base name keys the transfer.
    #[arg(long, value_name = "PATH")]
    pub filename: PathBuf,
}

pub async fn run(args: UploadArgs) -> eyre::Result<()> {
    let mut client = connect_peer(&args.peer).await?;
    ping_peer(&mut client).await?;

    let name = args
        .filename
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("'{}' has no file name", args.filename.display()))?;

    let mut file = tokio::fs::File::open(&args.filename)
        .await
        .wrap_err_with(|| format!("file [{}] not found", args.filename.display()))?;
    let size = file.metadata().await.wrap_err("stat")?.len();
    let total = total_chunks(size, UPLOAD_CHUNK_SIZE);

    let (tx, rx) = mpsc::channel(4);
    let producer = tokio::spawn(async move {
        if total == 0 {
            // An empty file still travels as one empty frame so the peer
            // records it.
            let frame = UploadFileChunk {
                file_name: name,
                chunk_number: 1,
                total_chunks: 0,
                data: Vec::new(),
            };
            let _ = tx.send(frame).await;
            println!("sent chunk[1/1]");
            return Ok::<(), std::io::Error>(());
        }

        let mut remaining = size;
        for chunk_number in 1..=total {
            let len = remaining.min(UPLOAD_CHUNK_SIZE) as usize;
            let mut data = vec![0u8; len];
            file.read_exact(&mut data).await?;
            remaining -= len as u64;

            let frame = UploadFileChunk {
                file_name: name.clone(),
                chunk_number,
                total_chunks: total,
                data,
            };
            if tx.send(frame).await.is_err() {
                break;
            }
            println!("sent chunk[{chunk_number}/{total}]");
        }
        Ok(())
    });

    let resp = client
        .upload_file(ReceiverStream::new(rx))
        .await
        .map_err(|status| eyre!("upload failed: {}", status.message()))?
        .into_inner();

    producer
        .await
        .wrap_err("upload task failed")?
        .wrap_err_with(|| format!("failed to read {}", args.filename.display()))?;

    if !resp.success {
        bail!("failed to complete the upload: {}", resp.message);
    }
    println!("upload complete");
    Ok(())
}
