//! Screen Lifecycle Adapter
//!
//! [`SettingsScreen`] is what the host's screen manager sees. It claims input
//! while visible, owns the panel session between `show` and `hide`, draws
//! through a [`Renderer`] and releases everything on `dispose`.

use crate::controller::{ControllerOptions, PanelSwitchController};
use crate::error::{SettingsError, SettingsResult};
use crate::host::{ScreenRef, SensorRegistry, SettingsHost};
use crate::panel::PanelRegistry;
use crate::render::{Frame, Renderer, Viewport, VIRTUAL_HEIGHT, VIRTUAL_WIDTH};
use crate::state::{settings_state, SettingsState, SettingsStateReader, SettingsStateWriter};
use flowpilot_params::Params;
use std::fmt;
use std::rc::Rc;

/// Name the surface registers under with the input router
pub const SURFACE_NAME: &str = "settings";

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOptions {
    pub controller: ControllerOptions,
    pub virtual_width: f32,
    pub virtual_height: f32,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            controller: ControllerOptions::default(),
            virtual_width: VIRTUAL_WIDTH,
            virtual_height: VIRTUAL_HEIGHT,
        }
    }
}

/// The settings surface.
pub struct SettingsScreen {
    registry: Rc<PanelRegistry>,
    params: Params,
    host: SettingsHost,
    state: Rc<SettingsStateWriter>,
    options: ScreenOptions,
    viewport: Viewport,
    renderer: Option<Box<dyn Renderer>>,
    controller: Option<PanelSwitchController>,
    disposed: bool,
}

impl SettingsScreen {
    pub fn new(
        registry: Rc<PanelRegistry>,
        params: Params,
        host: SettingsHost,
        state: Rc<SettingsStateWriter>,
        renderer: Box<dyn Renderer>,
        options: ScreenOptions,
    ) -> Self {
        Self {
            viewport: Viewport::new(options.virtual_width, options.virtual_height),
            registry,
            params,
            host,
            state,
            options,
            renderer: Some(renderer),
            controller: None,
            disposed: false,
        }
    }

    /// Screen over the standard panels. Also returns a read-only view of the
    /// settings state for other screens.
    pub fn standard(
        params: Params,
        host: SettingsHost,
        sensors: SensorRegistry,
        renderer: Box<dyn Renderer>,
        options: ScreenOptions,
    ) -> SettingsResult<(Self, SettingsStateReader)> {
        let (writer, reader) = settings_state(SettingsState::default());
        writer.sync_from(&params);
        let state = Rc::new(writer);
        let registry = PanelRegistry::standard(state.clone(), sensors)?;
        let screen = Self::new(Rc::new(registry), params, host, state, renderer, options);
        Ok((screen, reader))
    }

    /// Become visible: claim input and start a session on the default panel.
    pub fn show(&mut self) -> SettingsResult<()> {
        self.ensure_alive()?;
        self.state.sync_from(&self.params);
        let controller = PanelSwitchController::new(
            self.registry.clone(),
            self.params.clone(),
            self.host.clone(),
            self.options.controller.clone(),
        )?;
        self.host.input.set_input_owner(Some(SURFACE_NAME));
        tracing::info!("Settings screen shown on panel {}", controller.active_panel());
        self.controller = Some(controller);
        Ok(())
    }

    /// Become hidden: release input and drop the session.
    pub fn hide(&mut self) -> SettingsResult<()> {
        self.ensure_alive()?;
        if self.controller.take().is_some() {
            self.host.input.set_input_owner(None);
            tracing::info!("Settings screen hidden");
        }
        Ok(())
    }

    /// Draw one frame. Does nothing while hidden.
    pub fn render(&mut self, delta: f32) -> SettingsResult<()> {
        self.ensure_alive()?;
        let (Some(controller), Some(renderer)) = (self.controller.as_mut(), self.renderer.as_mut())
        else {
            return Ok(());
        };

        let notices = controller.take_notices();
        let frame = Frame::compose(
            controller,
            self.options.controller.rows_per_page,
            self.viewport,
            notices,
            delta,
        );
        if let Err(e) = renderer.draw(&frame) {
            controller.requeue_notices(frame.notices);
            return Err(e.into());
        }
        Ok(())
    }

    /// Update the fit viewport for a new window size
    pub fn resize(&mut self, width: u32, height: u32) -> SettingsResult<()> {
        if self.disposed {
            tracing::debug!("Ignoring resize to {}x{} after dispose", width, height);
            return Err(SettingsError::Disposed);
        }
        self.viewport.update(width, height);
        tracing::debug!(
            "Settings viewport resized to {}x{} (scale {:.3})",
            width,
            height,
            self.viewport.scale
        );
        Ok(())
    }

    /// Close button: go back to the driving view
    pub fn on_close(&self) -> SettingsResult<()> {
        self.ensure_alive()?;
        self.host.navigator.set_active_screen(ScreenRef::OnRoad);
        Ok(())
    }

    /// Release input and renderer resources. Runs once; later calls are
    /// no-ops and every other operation fails with `Disposed`.
    pub fn dispose(&mut self) {
        if self.disposed {
            tracing::debug!("Settings screen already disposed");
            return;
        }
        if self.controller.take().is_some() {
            self.host.input.set_input_owner(None);
        }
        if let Some(mut renderer) = self.renderer.take() {
            renderer.release();
        }
        self.disposed = true;
        tracing::info!("Settings screen disposed");
    }

    pub fn is_visible(&self) -> bool {
        self.controller.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Active session, if visible
    pub fn controller(&self) -> Option<&PanelSwitchController> {
        self.controller.as_ref()
    }

    /// Active session for input handling
    pub fn controller_mut(&mut self) -> SettingsResult<&mut PanelSwitchController> {
        self.ensure_alive()?;
        self.controller.as_mut().ok_or(SettingsError::NotVisible)
    }

    fn ensure_alive(&self) -> SettingsResult<()> {
        if self.disposed {
            Err(SettingsError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for SettingsScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsScreen")
            .field("visible", &self.is_visible())
            .field("disposed", &self.disposed)
            .field("viewport", &self.viewport)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FixedPlatform, InputRouter, LoggingDeviceControl, Navigator};
    use crate::render::TextRenderer;
    use flowpilot_params::MemoryStore;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        owners: RefCell<Vec<Option<String>>>,
        screens: RefCell<Vec<ScreenRef>>,
    }

    impl InputRouter for Recorder {
        fn set_input_owner(&self, owner: Option<&str>) {
            self.owners.borrow_mut().push(owner.map(str::to_string));
        }
    }

    impl Navigator for Recorder {
        fn set_active_screen(&self, screen: ScreenRef) {
            self.screens.borrow_mut().push(screen);
        }
    }

    fn screen() -> (SettingsScreen, Rc<Recorder>) {
        let recorder = Rc::new(Recorder::default());
        let host = SettingsHost {
            navigator: recorder.clone(),
            input: recorder.clone(),
            device: Rc::new(LoggingDeviceControl),
            platform: Rc::new(FixedPlatform("Linux".into())),
        };
        let (screen, _reader) = SettingsScreen::standard(
            Params::new(MemoryStore::new()),
            host,
            SensorRegistry::new(),
            Box::new(TextRenderer::new(Vec::new())),
            ScreenOptions::default(),
        )
        .unwrap();
        (screen, recorder)
    }

    #[test]
    fn test_show_and_hide_route_input() {
        let (mut screen, recorder) = screen();
        assert!(!screen.is_visible());
        assert!(matches!(
            screen.controller_mut(),
            Err(SettingsError::NotVisible)
        ));

        screen.show().unwrap();
        assert!(screen.is_visible());
        screen.render(0.016).unwrap();
        screen.hide().unwrap();
        screen.hide().unwrap();

        assert_eq!(
            *recorder.owners.borrow(),
            vec![Some("settings".to_string()), None]
        );
    }

    #[test]
    fn test_on_close_goes_to_on_road() {
        let (mut screen, recorder) = screen();
        screen.show().unwrap();
        screen.on_close().unwrap();
        assert_eq!(*recorder.screens.borrow(), vec![ScreenRef::OnRoad]);
    }

    #[test]
    fn test_session_resets_on_show() {
        let (mut screen, _) = screen();
        screen.show().unwrap();
        screen
            .controller_mut()
            .unwrap()
            .select_panel(&crate::panel::PanelName::TOGGLES)
            .unwrap();
        screen.hide().unwrap();
        screen.show().unwrap();
        assert_eq!(
            screen.controller().unwrap().active_panel(),
            &crate::panel::PanelName::DEVICE
        );
    }

    #[test]
    fn test_resize_keeps_session() {
        let (mut screen, _) = screen();
        screen.show().unwrap();
        screen.resize(640, 360).unwrap();
        assert_eq!(screen.viewport().scale, 0.5);
        assert!(screen.is_visible());
    }

    #[test]
    fn test_disposed_screen_cannot_be_reused() {
        let (mut screen, recorder) = screen();
        screen.show().unwrap();
        screen.dispose();
        screen.dispose();
        assert!(screen.is_disposed());
        assert!(!screen.is_visible());
        assert!(matches!(screen.show(), Err(SettingsError::Disposed)));
        assert!(matches!(screen.render(0.0), Err(SettingsError::Disposed)));

        let before = *screen.viewport();
        assert!(matches!(
            screen.resize(640, 360),
            Err(SettingsError::Disposed)
        ));
        assert_eq!(*screen.viewport(), before);
        assert_eq!(
            *recorder.owners.borrow(),
            vec![Some("settings".to_string()), None]
        );
    }
}
