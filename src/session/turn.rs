//! History bookkeeping around a provider stream.

use futures::stream::{self, LocalBoxStream, StreamExt};

use super::{Fragment, FragmentStream};
use crate::error::ChatError;
use crate::message::Conversation;

struct TurnState<'a> {
    inner: LocalBoxStream<'static, Result<Fragment, ChatError>>,
    history: &'a mut Conversation,
    prompt: String,
    reply: String,
    fragments: usize,
    finished: bool,
}

/// Wraps a raw provider stream so the exchange is recorded on success.
///
/// Fragments pass through unchanged. When `inner` ends cleanly the user
/// prompt and the concatenated reply are appended to `history`. A stream that
/// ends without any text yields [`ChatError::EmptyResponse`] instead. After
/// any error the stream is fused and `history` is left untouched.
pub fn track_turn<'a>(
    history: &'a mut Conversation,
    prompt: String,
    inner: LocalBoxStream<'static, Result<Fragment, ChatError>>,
) -> FragmentStream<'a> {
    let state = TurnState {
        inner,
        history,
        prompt,
        reply: String::new(),
        fragments: 0,
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        if st.finished {
            return None;
        }
        match st.inner.next().await {
            Some(Ok(fragment)) => {
                st.reply.push_str(&fragment.text);
                st.fragments += 1;
                Some((Ok(fragment), st))
            }
            Some(Err(err)) => {
                tracing::info!(error = %err, "turn failed");
                st.finished = true;
                Some((Err(err), st))
            }
            None if st.reply.is_empty() => {
                tracing::info!(fragments = st.fragments, "stream ended without text");
                st.finished = true;
                Some((Err(ChatError::EmptyResponse), st))
            }
            None => {
                tracing::debug!(
                    fragments = st.fragments,
                    bytes = st.reply.len(),
                    "stream finished"
                );
                let prompt = std::mem::take(&mut st.prompt);
                let reply = std::mem::take(&mut st.reply);
                st.history.push_exchange(prompt, reply);
                None
            }
        }
    })
    .boxed_local()
}
