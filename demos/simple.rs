//! A simple example of what eventbridge has to offer: the three view-models
//! driven side by side, with the terminal standing in for their views

use eventbridge::utils::logger::ConsoleLogger;
use eventbridge::utils::sync::kill_process_on_panic;
use eventbridge::view_model::{
  TapViewModel, TimerBroadcastViewModel, TimerStreamViewModel,
};

use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  ConsoleLogger::init(log::Level::Info)?;
  kill_process_on_panic();

  let tap = TapViewModel::new()?;
  let broadcast = TimerBroadcastViewModel::new()?;
  let stream = TimerStreamViewModel::new()?;

  let _tap_view = tap.text().observe(|text: &str| println!("tap: {}", text));
  let _broadcast_view = broadcast
    .number_text()
    .observe(|text: &str| println!("broadcast: {}", text));
  let _stream_view = stream
    .number_text()
    .observe(|text: &str| println!("stream: {}", text));

  tap.tap();
  broadcast.start_timer();
  stream.start_timer();
  stream.start_secondary();
  std::thread::sleep(Duration::from_millis(3500));

  // Neither display changes from here on
  broadcast.stop_timer();
  stream.stop_timer();
  stream.stop_secondary();
  std::thread::sleep(Duration::from_secs(2));
  Ok(())
}
