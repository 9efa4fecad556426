//! stdin/stdout chat REPL for local testing.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::conversation::Conversation;
use super::matcher::IntentMatcher;

/// Run the REPL on the process's stdin/stdout until EOF or `/quit`.
pub async fn run(matcher: IntentMatcher) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_with(matcher, stdin, stdout).await
}

/// Drive a conversation from any line source into any writer.
pub async fn run_with<R, W>(matcher: IntentMatcher, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut conv = Conversation::open(matcher);
    let greeting = format!("{}\n", conv.messages()[0].text);
    output.write_all(greeting.as_bytes()).await?;
    output.flush().await?;

    let mut lines = input.lines();
    loop {
        eprint!("> ");
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break, // EOF
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                break;
            }
        };

        if line.trim() == "/quit" {
            break;
        }

        if let Some(reply) = conv.send(&line) {
            let text = format!("\n{}\n\n", reply.text);
            output.write_all(text.as_bytes()).await?;
            output.flush().await?;
        }
    }

    Ok(())
}
