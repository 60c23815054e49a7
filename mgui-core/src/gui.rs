//! GUI engine
//!
//! [`Gui`] owns everything one screen needs: the toolkit, the widget
//! registry, the latest-event slot and the remote session. The application
//! drives it from a single loop:
//!
//! ```text
//! init / init_from_storage
//!        │
//!        ▼
//!   ┌─────────┐  toolkit input   ┌────────────┐  Event  ┌─────────────┐
//!   │  poll   │ ───────────────▶ │ normalizer │ ──────▶ │ application │
//!   └─────────┘                  └────────────┘         └─────────────┘
//!        ▲                              │ broadcast
//!        │ inbox                        ▼
//!   network task ◀──────────────── RemoteTransport
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use embassy_sync::blocking_mutex::raw::RawMutex;

use mgui_display::{
    ColorSlot, Orientation, Point, Primitive, ToolkitError, WidgetHandle, WidgetToolkit,
};
use mgui_hal::{ClientId, FlashError, FlashStorage, RemoteTransport, StorageKey};
use mgui_protocol::{DocumentChunks, Notification, RemoteSession, SessionAction, MAX_DOCUMENT_SIZE};

use crate::config::{GuiConfig, BORDER_INSET};
use crate::document::{Dimensions, Document};
use crate::error::{Diagnostic, DocumentError, MutateError, RenderReport};
use crate::event::{Event, EventNormalizer};
use crate::mutate::{self, Change};
use crate::registry::Registry;
use crate::remote::{LinkStatus, RemoteInbox};
use crate::render;
use crate::sync;

/// Document rendered when nothing is stored
pub const DEFAULT_DOCUMENT: &str = include_str!("default_document.json");

/// Status text shown while the link is down
pub const NO_ADDRESS_TEXT: &str = "IP: N/A";

/// Pick the display orientation for a document
///
/// Without a request the longer side is horizontal. A request that would
/// put the document's longer side across the short edge of the panel is
/// overridden.
pub fn resolve_orientation(
    width: u16,
    height: u16,
    requested: Option<Orientation>,
) -> Orientation {
    let Some(requested) = requested else {
        return if width < height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };
    };

    if requested.is_landscape() && width < height {
        warn!("Portrait document cannot be shown in landscape, using portrait");
        Orientation::Portrait
    } else if !requested.is_landscape() && width > height {
        warn!("Landscape document cannot be shown in portrait, using landscape");
        Orientation::Landscape
    } else {
        requested
    }
}

/// Document rendering and event engine
pub struct Gui<T: WidgetToolkit> {
    toolkit: T,
    config: GuiConfig,
    registry: Registry,
    normalizer: EventNormalizer,
    session: RemoteSession,
    storage: Option<Box<dyn FlashStorage>>,
    remote: Option<Box<dyn RemoteTransport>>,
    /// Text of the document on screen
    document: String,
    dimensions: Dimensions,
    /// The next render shows a document read from storage
    from_storage: bool,
    border: Option<WidgetHandle>,
    border_requested: bool,
}

impl<T: WidgetToolkit> Gui<T> {
    pub fn new(toolkit: T, config: GuiConfig) -> Self {
        Self {
            toolkit,
            normalizer: EventNormalizer::new(config.broadcast_slider_drag),
            config,
            registry: Registry::new(),
            session: RemoteSession::new(),
            storage: None,
            remote: None,
            document: String::new(),
            dimensions: Dimensions::default(),
            from_storage: false,
            border: None,
            border_requested: false,
        }
    }

    /// Persist documents that ask for it to `storage`
    pub fn with_storage(mut self, storage: Box<dyn FlashStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Mirror state changes to remote clients through `remote`
    pub fn attach_remote(&mut self, remote: Box<dyn RemoteTransport>) {
        self.remote = Some(remote);
    }

    pub fn detach_remote(&mut self) -> Option<Box<dyn RemoteTransport>> {
        self.session.reset();
        self.remote.take()
    }

    /// Configure the display for `text` and render it
    ///
    /// `orientation` falls back to the configured orientation, then to the
    /// document's aspect ratio.
    pub fn init(
        &mut self,
        text: &str,
        orientation: Option<Orientation>,
    ) -> Result<RenderReport, DocumentError> {
        let document = Document::parse(text)?;
        let Dimensions { width, height } = document.dimensions();
        let requested = orientation.or(self.config.orientation);
        let orientation = resolve_orientation(width, height, requested);
        info!("Display {}x{}, rotation {}", width, height, orientation.rotation());
        self.toolkit.configure(width, height, orientation);
        Ok(self.show(&document, text))
    }

    /// Render the stored document, or [`DEFAULT_DOCUMENT`] when there is none
    pub fn init_from_storage(
        &mut self,
        orientation: Option<Orientation>,
    ) -> Result<RenderReport, DocumentError> {
        match self.load_document() {
            Some(stored) => {
                self.from_storage = true;
                match self.init(&stored, orientation) {
                    Ok(report) => return Ok(report),
                    Err(e) => {
                        warn!("Stored document unusable: {:?}", e);
                        self.from_storage = false;
                    }
                }
            }
            None => info!("No stored document, showing the default screen"),
        }
        self.init(DEFAULT_DOCUMENT, orientation)
    }

    fn load_document(&mut self) -> Option<String> {
        let storage = self.storage.as_mut()?;
        if !storage.exists(StorageKey::GuiDocument) {
            return None;
        }
        let mut buffer = vec![0u8; MAX_DOCUMENT_SIZE];
        let len = match storage.read(StorageKey::GuiDocument, &mut buffer) {
            Ok(len) => len,
            Err(FlashError::NotFound) => return None,
            Err(e) => {
                warn!("Failed to read stored document: {:?}", e);
                return None;
            }
        };
        buffer.truncate(len);
        match String::from_utf8(buffer) {
            Ok(text) => Some(text),
            Err(_) => {
                warn!("Stored document is not valid UTF-8");
                None
            }
        }
    }

    /// Replace the screen with the document `text`
    ///
    /// A document that does not parse leaves the current screen untouched.
    pub fn render(&mut self, text: &str) -> Result<RenderReport, DocumentError> {
        let document = Document::parse(text).inspect_err(|e| {
            warn!("Document rejected: {:?}", e);
        })?;
        Ok(self.show(&document, text))
    }

    fn show(&mut self, document: &Document, text: &str) -> RenderReport {
        let released = self.registry.release();
        debug!("Released {} widget records", released);
        self.toolkit.clear_screen();
        self.normalizer.reset();
        self.border = None;

        let mut report =
            render::render(document, &mut self.toolkit, &mut self.registry, &self.config);
        self.document = String::from(text);
        self.dimensions = document.dimensions();

        if document.is_persistent() && !self.from_storage {
            if let Err(e) = self.store_document() {
                warn!("Failed to store document: {:?}", e);
                report.diagnostics.push(Diagnostic::Storage(e));
            }
        }
        self.from_storage = false;

        if self.border_requested {
            self.draw_border();
        }

        info!(
            "Rendered {} widgets with {} diagnostics",
            report.widgets,
            report.diagnostics.len()
        );
        report
    }

    fn store_document(&mut self) -> Result<(), FlashError> {
        let Some(storage) = self.storage.as_mut() else {
            debug!("No storage attached, document not persisted");
            return Ok(());
        };
        // A failed write leaves nothing stored
        storage.remove(StorageKey::GuiDocument)?;
        storage.write(StorageKey::GuiDocument, self.document.as_bytes())?;
        info!("Stored {} byte document", self.document.len());
        Ok(())
    }

    /// Run the toolkit and return the latest event
    ///
    /// Returns [`Event::none`] when nothing happened since the last call.
    pub fn poll(&mut self) -> Event {
        let mut inputs = Vec::new();
        self.toolkit.tick(&mut |input| inputs.push(input));

        for input in inputs {
            let normalized = self
                .normalizer
                .normalize(input, &mut self.registry, &mut self.toolkit);
            let Some(normalized) = normalized else {
                continue;
            };
            debug!(
                "Event {} from {}: {}",
                normalized.event.event_id.as_str(),
                normalized.event.parent_id.as_str(),
                normalized.event.value
            );
            if normalized.broadcast {
                self.notify(Notification::Value {
                    name: &normalized.event.parent_id,
                    value: normalized.event.value,
                });
            }
            self.normalizer.latch(normalized.event);
        }

        self.normalizer.take()
    }

    /// Handle queued remote messages, then [`Gui::poll`]
    pub fn poll_with_inbox<M: RawMutex, const N: usize>(
        &mut self,
        inbox: &RemoteInbox<M, N>,
    ) -> Event {
        while let Ok((client, text)) = inbox.try_receive() {
            self.handle_remote_message(client, &text);
        }
        self.poll()
    }

    /// Set a widget's value and tell remote clients
    pub fn set_value(&mut self, name: &str, value: i32) -> Result<(), MutateError> {
        self.set_value_with(name, value, true)
    }

    pub fn set_value_with(
        &mut self,
        name: &str,
        value: i32,
        broadcast: bool,
    ) -> Result<(), MutateError> {
        let change = mutate::set_value(&mut self.registry, &mut self.toolkit, name, value)?;
        if broadcast {
            match &change {
                Change::Value(value) => self.notify(Notification::Value {
                    name,
                    value: *value,
                }),
                Change::Text(text) => self.notify(Notification::Text { name, text }),
            }
        }
        Ok(())
    }

    /// Set a textfield's text and tell remote clients
    pub fn set_text(&mut self, name: &str, text: &str) -> Result<(), MutateError> {
        self.set_text_with(name, text, true)
    }

    pub fn set_text_with(
        &mut self,
        name: &str,
        text: &str,
        broadcast: bool,
    ) -> Result<(), MutateError> {
        mutate::set_text(&self.registry, &mut self.toolkit, name, text)?;
        if broadcast {
            self.notify(Notification::Text { name, text });
        }
        Ok(())
    }

    pub fn get_value(&self, name: &str) -> Result<i32, MutateError> {
        mutate::get_value(&self.registry, &self.toolkit, name)
    }

    /// Write live widget state into the retained document and return it
    pub fn update_document(&mut self) -> &str {
        match sync::sync_document(&self.document, &self.registry, &self.toolkit) {
            Ok(text) => self.document = text,
            Err(e) => warn!("Document not synced: {:?}", e),
        }
        &self.document
    }

    /// Text of the document on screen, as last rendered or synced
    pub fn document_text(&self) -> &str {
        &self.document
    }

    /// Act on one text message from a remote client
    pub fn handle_remote_message(&mut self, client: ClientId, text: &str) {
        let action = match self.session.feed(text) {
            Ok(action) => action,
            Err(e) => {
                warn!("Remote message from client {} rejected: {:?}", client.0, e);
                return;
            }
        };
        let reply = action.reply();

        match action {
            SessionAction::SendDocument => {
                self.update_document();
                self.send_document(client);
            }
            SessionAction::Acknowledge => {}
            SessionAction::DocumentReceived(document) => {
                info!("Received {} byte document", document.len());
                self.from_storage = false;
                if let Err(e) = self.render(&document) {
                    warn!("Received document not shown: {:?}", e);
                }
            }
            SessionAction::Control(control) => {
                if let Err(e) = self.set_value(&control.parent, control.value) {
                    warn!("Control for {} not applied: {:?}", control.parent.as_str(), e);
                }
                self.normalizer.latch(Event::new(
                    &control.event,
                    &control.parent,
                    control.value,
                ));
            }
        }

        if let Some(reply) = reply {
            if let Some(remote) = self.remote.as_mut() {
                remote.send_to(client, reply);
            }
        }
    }

    fn send_document(&mut self, client: ClientId) {
        let Some(remote) = self.remote.as_mut() else {
            return;
        };
        let mut chunks = 0usize;
        for chunk in DocumentChunks::new(&self.document) {
            remote.send_to(client, chunk);
            chunks += 1;
        }
        debug!("Sent document to client {} in {} messages", client.0, chunks);
    }

    fn notify(&mut self, notification: Notification) {
        let Some(remote) = self.remote.as_mut() else {
            return;
        };
        if !remote.is_active() {
            return;
        }
        match notification.encode() {
            Ok(text) => remote.broadcast(&text),
            Err(e) => warn!("Notification not encoded: {:?}", e),
        }
    }

    /// Draw the link-down border around the screen
    pub fn show_border(&mut self) {
        self.border_requested = true;
        if self.border.is_none() {
            self.draw_border();
        }
    }

    pub fn hide_border(&mut self) {
        self.border_requested = false;
        if let Some(border) = self.border.take() {
            let _ = self.toolkit.delete(border);
        }
    }

    pub fn is_border_shown(&self) -> bool {
        self.border.is_some()
    }

    fn draw_border(&mut self) {
        match self.create_border() {
            Ok(border) => self.border = Some(border),
            Err(e) => warn!("Link border not drawn: {:?}", e),
        }
    }

    fn create_border(&mut self) -> Result<WidgetHandle, ToolkitError> {
        let right = i32::from(self.dimensions.width) - BORDER_INSET;
        let bottom = i32::from(self.dimensions.height) - BORDER_INSET;
        let points = [
            Point::new(BORDER_INSET, BORDER_INSET),
            Point::new(right, BORDER_INSET),
            Point::new(right, bottom),
            Point::new(BORDER_INSET, bottom),
            Point::new(BORDER_INSET, BORDER_INSET),
        ];

        let line = self.toolkit.create(Primitive::Line, None)?;
        let styled = self
            .toolkit
            .set_points(line, &points)
            .and_then(|()| self.style_border(line));
        if let Err(e) = styled {
            let _ = self.toolkit.delete(line);
            return Err(e);
        }
        Ok(line)
    }

    fn style_border(&mut self, line: WidgetHandle) -> Result<(), ToolkitError> {
        self.toolkit.set_line_width(line, self.config.border_width)?;
        self.toolkit
            .set_color(line, ColorSlot::Line, self.config.border_color)
    }

    /// Reflect a network link change on screen
    ///
    /// The status textfield shows the address while connected; the border
    /// marks a lost link.
    pub fn link_status_changed(&mut self, status: LinkStatus) {
        let field = self.config.status_field.clone();
        match status {
            LinkStatus::Connected { address } => {
                info!("Link up at {}", address.as_str());
                self.hide_border();
                self.show_status(&field, &address);
            }
            LinkStatus::Disconnected => {
                info!("Link down");
                self.session.reset();
                self.show_border();
                self.show_status(&field, NO_ADDRESS_TEXT);
            }
        }
    }

    fn show_status(&mut self, field: &str, text: &str) {
        if let Err(e) = self.set_text_with(field, text, false) {
            warn!("Status field {} not updated: {:?}", field, e);
        }
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }
}
