//! Link resolver task
//!
//! Runs the resolver on a fixed period with the configured byte budget,
//! abandons half-received messages after inbound silence, and echoes every
//! received message back to the host.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use serlink_core::{Direction, LinkConfig, MessageQueue, MessageQueues, QueueFull, Resolver};

use crate::config::QUEUE_DEPTH;
use crate::{LINK, PORT};

/// Link task - drives the resolver and the loopback consumer
#[embassy_executor::task]
pub async fn link_task(config: LinkConfig) {
    info!(
        "Link task started: budget={} interval={}ms timeout={}ms",
        config.resolve_budget, config.resolve_interval_ms, config.inbound_timeout_ms
    );

    let mut resolver = Resolver::new(&config);
    let mut queues = MessageQueues::<QUEUE_DEPTH>::new();
    let mut ticker = Ticker::every(Duration::from_millis(config.resolve_interval_ms as u64));
    let mut last_inbound = Instant::now();

    loop {
        ticker.next().await;

        let report = resolver.resolve(
            &LINK,
            &PORT,
            &mut queues,
            usize::from(config.resolve_budget),
        );
        if report.iterations > 0 {
            trace!("Resolve: {:?}", report);
        }
        if report.errors_reported > 0 {
            warn!("Link error reported to host");
        }

        if report.bytes_decoded > 0 {
            last_inbound = Instant::now();
        } else if resolver.expire_inbound(&LINK, last_inbound.elapsed().as_millis()) {
            warn!("Inbound message timed out, resynchronizing");
        }

        echo_inbound(&mut queues);
    }
}

/// Send every received message back to the host
fn echo_inbound<Q: MessageQueue>(queues: &mut Q) {
    while let Ok(message) = queues.pop(Direction::Inbound) {
        debug!(
            "RX type={=u8:#04x} size={}",
            message.msg_type,
            message.size()
        );
        if let Err(QueueFull(dropped)) = queues.push(message, Direction::Outbound) {
            warn!("Outbound queue full, dropping echo of {=u8:#04x}", dropped.msg_type);
        }
    }
}
