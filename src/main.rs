use action_channels::input::{KeyBinding, KeyboardAction};
use action_channels::{
    ActionCallback, ActionChannel, ActionKind, ActionReceiver, ChannelAssets, ChannelSettings,
    ReceiverId,
};
use anyhow::Result;
use log::info;
use std::rc::Rc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::KeyCode,
    window::WindowBuilder,
};

/// Logs every action it receives
struct ConsoleReceiver {
    id: ReceiverId,
}

impl ActionReceiver for ConsoleReceiver {
    fn receiver_id(&self) -> ReceiverId {
        self.id
    }
}

impl ConsoleReceiver {
    fn listen(&self, channel: &ActionChannel) -> Result<()> {
        for kind in ActionKind::ALL {
            let name = channel.name().to_string();
            channel.add_listener(
                self,
                ActionCallback::new(move |value| info!("{} {}: {:?}", name, kind, value)),
                kind,
            );
        }

        if channel.has_input_source() {
            channel.register_to_input(self)?;
        }
        Ok(())
    }
}

/// Built-in channels used when the asset directory has none
fn default_channels(assets: &mut ChannelAssets) -> Result<()> {
    let jump = Rc::new(KeyboardAction::from_bindings(
        "jump",
        vec![KeyBinding::key(KeyCode::Space), KeyBinding::key(KeyCode::KeyW)],
    ));
    assets.sources_mut().register_keyboard(jump.clone());

    let settings = ChannelSettings::new()
        .with_description("Makes the player jump")
        .with_input_source(jump)
        .with_started(true)
        .with_cancelled(true);
    assets.insert_channel(ActionChannel::with_settings("Jump", settings))?;
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let asset_dir = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    info!("Loading action channels from {}...", asset_dir);

    let mut assets = ChannelAssets::new(&asset_dir);
    if assets.load_all()? == 0 {
        info!("No channel assets found, using built-in channels");
        default_channels(&mut assets)?;
    }

    let receiver = ConsoleReceiver {
        id: ReceiverId::new(),
    };
    for name in assets.channel_names() {
        if let Some(channel) = assets.channel(&name) {
            receiver.listen(&channel)?;
        }
    }

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Action Channels")
        .with_inner_size(winit::dpi::LogicalSize::new(640, 360))
        .build(&event_loop)?;

    info!("Window created, press bound keys to fire actions");

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                assets.shutdown();
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                assets.sources().process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::MouseInput { state, button, .. },
                ..
            } => {
                assets.sources().process_mouse_event(button, state);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                assets.sources().reset_keyboard();
            }
            Event::AboutToWait => {
                #[cfg(debug_assertions)]
                for name in assets.reload_changed() {
                    // Reloading drops the channel's listeners
                    if let Some(channel) = assets.channel(&name) {
                        if let Err(err) = receiver.listen(&channel) {
                            log::warn!("Can't listen to '{}': {}", name, err);
                        }
                    }
                }
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
