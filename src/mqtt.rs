//! MQTT command listener
//!
//! Subscribes to a topic and turns each payload into a [`Command`] with the
//! same parser the control socket uses. Payloads that do not parse are
//! reported on stderr and dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};

use crate::config::DEFAULT_MQTT_TOPIC;
use crate::control::{parse_message, Command};
use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 1883;

/// Split `host[:port]`, falling back to the standard MQTT port
fn split_host(host: &str) -> (&str, u16) {
    match host.rsplit_once(':') {
        Some((name, port)) => match port.parse() {
            Ok(port) => (name, port),
            Err(_) => (host, DEFAULT_PORT),
        },
        None => (host, DEFAULT_PORT),
    }
}

/// MQTT client that receives commands in a background thread
pub struct MqttClient {
    receiver: Receiver<Command>,
    _thread: thread::JoinHandle<()>,
}

impl MqttClient {
    /// Connect to the broker and subscribe to `topic`.
    /// Fails immediately if the broker cannot be reached.
    pub fn new(host: &str, topic: &str) -> Result<Self> {
        let topic = if topic.is_empty() { DEFAULT_MQTT_TOPIC } else { topic };
        let (name, port) = split_host(host);

        let mut options = MqttOptions::new("wireshade", name, port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut connection) = Client::new(options, 10);
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map_err(|e| Error::Mqtt(format!("failed to subscribe to '{}': {}", topic, e)))?;

        // Fail fast if the broker is unreachable
        match connection.iter().next() {
            Some(Ok(_)) => {},
            Some(Err(e)) => {
                return Err(Error::Mqtt(format!(
                    "failed to connect to {}:{}: {}",
                    name, port, e
                )));
            },
            None => {
                return Err(Error::Mqtt(format!(
                    "failed to connect to {}:{}: connection closed",
                    name, port
                )));
            },
        }

        let (sender, receiver) = mpsc::channel();
        let topic_owned = topic.to_string();
        let handle = thread::spawn(move || {
            // The client must outlive the event loop or the subscription drops
            let _client = client;
            Self::message_loop(connection, sender, &topic_owned);
        });

        eprintln!("MQTT: connected to {}:{}, subscribed to '{}'", name, port, topic);

        Ok(Self {
            receiver,
            _thread: handle,
        })
    }

    fn message_loop(mut connection: Connection, sender: Sender<Command>, topic: &str) {
        for event in connection.iter() {
            match event {
                Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topic => {
                    let Ok(text) = std::str::from_utf8(&publish.payload) else {
                        eprintln!("MQTT: ignoring non-UTF-8 payload");
                        continue;
                    };
                    match parse_message(text) {
                        Some(cmd) => {
                            if sender.send(cmd).is_err() {
                                // Viewer gone
                                break;
                            }
                        },
                        None if text.trim().is_empty() => {},
                        None => eprintln!("MQTT: unknown command '{}'", text.trim()),
                    }
                },
                Ok(_) => {},
                Err(e) => {
                    // rumqttc reconnects on the next poll
                    eprintln!("MQTT error: {}", e);
                    thread::sleep(Duration::from_secs(1));
                },
            }
        }
    }

    /// Drain pending commands without blocking, oldest first
    pub fn poll(&self) -> Vec<Command> {
        self.receiver.try_iter().collect()
    }
}
