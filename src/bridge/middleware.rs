//! Completion redirection for embedded SOQL.
//!
//! Every completion request goes to the Apex engine first. If its answer
//! carries the SOQL sentinel, the request is re-issued against a virtual
//! document holding only the query text, and the SOQL engine's answer is
//! returned instead. Otherwise the Apex answer passes through untouched.
//!
//! The request suspends twice: once on the Apex engine, once on the virtual
//! document completion. Neither call is retried or cancelled from here.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{
    CompletionContext, CompletionItem, CompletionResponse, Position, Uri,
};

use super::content_provider::ContentProviders;
use super::detector::{
    BindingExpressionDetector, NoBindingDetection, SoqlBlock, detect_soql_block,
};
use super::store::{VirtualDocumentProvider, VirtualDocumentStore};
use super::virtual_uri::VirtualUriCodec;
use crate::config::BridgeSettings;
use crate::document::{HostDocument, synthesize_virtual_content};
use crate::error::{BridgeError, BridgeResult};

/// The host-language (Apex) completion engine: the next handler in the chain.
pub trait HostCompletionProvider {
    fn provide_completion_items(
        &self,
        document: &HostDocument,
        position: Position,
        context: Option<&CompletionContext>,
        token: &CancellationToken,
    ) -> impl Future<Output = BridgeResult<Option<CompletionResponse>>> + Send;
}

/// Runs completion providers against an arbitrary document URI.
pub trait CompletionCommandExecutor {
    fn execute_completion_item_provider(
        &self,
        uri: Uri,
        position: Position,
        trigger_character: Option<String>,
    ) -> impl Future<Output = BridgeResult<Option<CompletionResponse>>> + Send;
}

/// Items of either completion result shape.
pub fn completion_items(response: &CompletionResponse) -> &[CompletionItem] {
    match response {
        CompletionResponse::Array(items) => items,
        CompletionResponse::List(list) => &list.items,
    }
}

pub struct SoqlCompletionMiddleware<E> {
    store: Arc<VirtualDocumentStore>,
    codec: VirtualUriCodec,
    sentinel_label: String,
    binding_detector: Box<dyn BindingExpressionDetector>,
    executor: E,
}

impl<E> std::fmt::Debug for SoqlCompletionMiddleware<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoqlCompletionMiddleware")
            .field("codec", &self.codec)
            .field("sentinel_label", &self.sentinel_label)
            .field("documents", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl<E: CompletionCommandExecutor> SoqlCompletionMiddleware<E> {
    pub fn new(executor: E, settings: &BridgeSettings) -> Self {
        Self {
            store: Arc::new(VirtualDocumentStore::new()),
            codec: VirtualUriCodec::from_settings(settings),
            sentinel_label: settings.sentinel_label.clone(),
            binding_detector: Box::new(NoBindingDetection),
            executor,
        }
    }

    /// Build the middleware and register its virtual documents under the
    /// configured scheme. Call once per registry.
    pub fn activate(
        providers: &ContentProviders,
        executor: E,
        settings: &BridgeSettings,
    ) -> BridgeResult<Self> {
        let middleware = Self::new(executor, settings);
        providers.register(
            middleware.codec.scheme(),
            Arc::new(middleware.content_provider()),
        )?;
        log::info!(
            target: "soql_bridge::middleware",
            "Embedded SOQL completion active for scheme {}",
            middleware.codec.scheme()
        );
        Ok(middleware)
    }

    pub fn with_binding_detector(
        mut self,
        detector: impl BindingExpressionDetector + 'static,
    ) -> Self {
        self.binding_detector = Box::new(detector);
        self
    }

    pub fn store(&self) -> &Arc<VirtualDocumentStore> {
        &self.store
    }

    pub fn codec(&self) -> &VirtualUriCodec {
        &self.codec
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Content provider backed by this middleware's store.
    pub fn content_provider(&self) -> VirtualDocumentProvider {
        VirtualDocumentProvider::new(Arc::clone(&self.store), self.codec.clone())
    }

    /// Intercept one completion request.
    ///
    /// The Apex result is returned as-is (same variant, same items) unless it
    /// reports a SOQL block outside a bind expression.
    pub async fn provide_completion_item<N: HostCompletionProvider>(
        &self,
        document: &HostDocument,
        position: Position,
        context: Option<&CompletionContext>,
        token: &CancellationToken,
        next: &N,
    ) -> BridgeResult<Option<CompletionResponse>> {
        let host_result = next
            .provide_completion_items(document, position, context, token)
            .await?;

        let Some(block) = host_result
            .as_ref()
            .and_then(|result| detect_soql_block(completion_items(result), &self.sentinel_label))
        else {
            log::trace!(
                target: "soql_bridge::middleware",
                "No SOQL block at {}:{}:{}",
                document.key(),
                position.line,
                position.character
            );
            return Ok(host_result);
        };

        if self
            .binding_detector
            .is_inside_binding_expression(document, &block.query_text, position)
        {
            log::trace!(
                target: "soql_bridge::middleware",
                "Cursor in bind expression, keeping Apex completions"
            );
            return Ok(host_result);
        }

        let content = match synthesize_virtual_content(
            &document.text,
            document.eol,
            &block.query_text,
            block.location.start_index,
        ) {
            Ok(content) => content,
            Err(err) => {
                log::warn!(
                    target: "soql_bridge::middleware",
                    "Skipping SOQL completion for {}: {}",
                    document.key(),
                    err
                );
                return Ok(host_result);
            }
        };

        self.redirect(document, position, context, &block, content)
            .await
            .map(Some)
    }

    async fn redirect(
        &self,
        document: &HostDocument,
        position: Position,
        context: Option<&CompletionContext>,
        block: &SoqlBlock,
        content: String,
    ) -> BridgeResult<CompletionResponse> {
        let host_key = document.key();
        self.store.insert(host_key, content);

        let virtual_uri = self.codec.encode(host_key);
        let uri: Uri = virtual_uri
            .parse()
            .map_err(|_| BridgeError::invalid_virtual_uri(virtual_uri.as_str()))?;

        log::debug!(
            target: "soql_bridge::middleware",
            "Redirecting completion to {} (block at {}, {} chars)",
            virtual_uri,
            block.location.start_index,
            block.query_text.len()
        );

        let trigger_character = context.and_then(|ctx| ctx.trigger_character.clone());
        let result = self
            .executor
            .execute_completion_item_provider(uri, position, trigger_character)
            .await?;

        Ok(result.unwrap_or_else(|| CompletionResponse::Array(Vec::new())))
    }
}
