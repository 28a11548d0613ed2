//! SDL2 window for the interactive viewer

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use super::FrameBuffer;
use crate::error::{Error, Result};

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

/// Streaming texture the frame buffer is uploaded into
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
}

/// Window events the viewer reacts to; mouse buttons other than the left
/// one are dropped
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    MouseMove { x: i32, y: i32 },
    MouseDown { x: i32, y: i32 },
    MouseUp { x: i32, y: i32 },
}

impl Display {
    /// Create display with custom resolution and VSync settings
    /// vsync=true: locked to monitor refresh
    /// vsync=false: redraw as fast as events arrive
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>)> {
        let sdl_context = sdl2::init().map_err(Error::Sdl)?;
        let video_subsystem = sdl_context.video().map_err(Error::Sdl)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| Error::Sdl(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| Error::Sdl(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(Error::Sdl)?;

        Ok((Self { canvas, event_pump }, texture_creator))
    }

    pub fn present(&mut self, target: &mut RenderTarget, buffer: &FrameBuffer) -> Result<()> {
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| Error::Sdl(e.to_string()))?;

        self.canvas
            .copy(&target.texture, None, None)
            .map_err(Error::Sdl)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseMotion { x, y, .. } => events.push(InputEvent::MouseMove { x, y }),
                Event::MouseButtonDown {
                    x,
                    y,
                    mouse_btn: MouseButton::Left,
                    ..
                } => events.push(InputEvent::MouseDown { x, y }),
                Event::MouseButtonUp {
                    x,
                    y,
                    mouse_btn: MouseButton::Left,
                    ..
                } => events.push(InputEvent::MouseUp { x, y }),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming texture matching the frame buffer size
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| Error::Sdl(e.to_string()))?;
        Ok(Self { texture })
    }
}
