mod reducer;
mod runtime;
mod shortcuts;

use super::super::messages::Message;
use super::super::state::{
    App, CAPTURE_POLL_INTERVAL, COUNTDOWN_INTERVAL, SIGNAL_POLL_INTERVAL,
};
use iced::event;
use iced::time;
use iced::window;
use iced::{Subscription, Task};

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> = vec![
            event::listen_with(runtime::runtime_event_to_message),
            time::every(SIGNAL_POLL_INTERVAL).map(|_| Message::PollSystemSignals),
        ];

        // Frame callbacks exist only while scrolling; stopping drops them.
        if app.playback.clock.is_running() && app.scroll_enabled() {
            subscriptions.push(window::frames().map(Message::Frame));
        }
        if app.playback.clock.needs_second_ticks() {
            subscriptions.push(time::every(COUNTDOWN_INTERVAL).map(Message::SecondTick));
        }
        if app.voice.capture.is_some() {
            subscriptions.push(time::every(CAPTURE_POLL_INTERVAL).map(|_| Message::PollCapture));
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        if effects.is_empty() {
            Task::none()
        } else {
            Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
        }
    }
}
