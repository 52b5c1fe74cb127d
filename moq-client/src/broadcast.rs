//! Broadcast discovery.
//!
//! Every namespace the peer announces is probed for a catalog in its own
//! task. Broadcasts come out of [`Broadcasts::next`] in the order their
//! catalogs finished loading, not the order they were announced; a
//! broadcast whose catalog cannot be fetched is logged and dropped without
//! disturbing the others.

use std::sync::Arc;

use moq_protocol::TrackNamespace;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::queue::{queue, Consumer, Producer};
use crate::session::{Announce, Announcements, CloseStatus, Subscription};

/// An announced namespace together with its decoded catalog.
#[derive(Debug)]
pub struct Broadcast<A> {
    announce: A,
    catalog: Catalog,
}

impl<A: Announce> Broadcast<A> {
    pub fn name(&self) -> &TrackNamespace {
        self.announce.namespace()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Subscribe to one of the broadcast's tracks.
    pub async fn subscribe(&self, track: &str) -> Result<A::Subscription> {
        self.announce.subscribe(track).await
    }
}

/// Discovered broadcasts waiting to be taken by [`Broadcasts::next`].
pub type BroadcastQueue<A> = Consumer<Broadcast<A>>;

pub struct Broadcasts<A> {
    queue: BroadcastQueue<A>,
    shutdown: watch::Sender<bool>,
}

impl<A: Announce> Broadcasts<A> {
    /// Start discovering broadcasts. Must be called within a tokio runtime.
    pub fn new<S>(announcements: S) -> Self
    where
        S: Announcements<Announce = A>,
    {
        Self::with_config(announcements, Config::default())
    }

    pub fn with_config<S>(announcements: S, config: Config) -> Self
    where
        S: Announcements<Announce = A>,
    {
        let (producer, queue) = queue();
        let (shutdown, stop) = watch::channel(false);

        let task = tokio::spawn(run(
            announcements,
            producer.clone(),
            Arc::new(config),
            stop,
        ));
        tokio::spawn(async move {
            if let Err(err) = task.await {
                warn!(%err, "announce loop panicked");
                producer.abort(Error::Session(format!("announce loop failed: {err}")));
            }
        });

        Self { queue, shutdown }
    }

    /// The next broadcast whose catalog has loaded.
    ///
    /// Fails with the announce loop's error once that loop has failed,
    /// on this and every later call. Returns `Ok(None)` when announcements
    /// have ended and every pending fetch has finished.
    pub async fn next(&mut self) -> Result<Option<Broadcast<A>>> {
        self.queue.next().await
    }
}

impl<A> Drop for Broadcasts<A> {
    // Stops the announce loop; pending fetches close their subscriptions.
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

// Resolves once discovery is dropped.
async fn stopped(stop: &mut watch::Receiver<bool>) {
    // Err means the sender is gone, which is a stop as well.
    let _ = stop.wait_for(|stop| *stop).await;
}

async fn run<S: Announcements>(
    mut announcements: S,
    producer: Producer<Broadcast<S::Announce>>,
    config: Arc<Config>,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        let next = tokio::select! {
            next = announcements.next() => next,
            _ = stopped(&mut stop) => {
                debug!("discovery stopped");
                return;
            }
        };

        let announce = match next {
            Ok(Some(announce)) => announce,
            Ok(None) => {
                debug!("announcements finished");
                return;
            }
            Err(err) => {
                warn!(%err, "announce loop failed");
                producer.abort(err);
                return;
            }
        };

        debug!(namespace = %announce.namespace(), "broadcast announced");

        let producer = producer.clone();
        let config = config.clone();
        let stop = stop.clone();
        tokio::spawn(async move {
            let namespace = announce.namespace().clone();
            match fetch(announce, &config, stop).await {
                Ok(broadcast) => {
                    info!(%namespace, tracks = ?broadcast.catalog.tracks(), "broadcast available");
                    producer.push(broadcast);
                }
                Err(Error::Cancelled) => debug!(%namespace, "catalog fetch cancelled"),
                Err(err) => warn!(%namespace, %err, "failed to fetch catalog"),
            }
        });
    }
}

// Subscribe to the catalog track and read its first segment. The
// subscription is closed exactly once on every path that opened it,
// including discovery being dropped mid-read.
async fn fetch<A: Announce>(
    announce: A,
    config: &Config,
    mut stop: watch::Receiver<bool>,
) -> Result<Broadcast<A>> {
    let mut subscription = tokio::select! {
        res = announce.subscribe(&config.catalog_track) => res?,
        _ = stopped(&mut stop) => return Err(Error::Cancelled),
    };

    let res = tokio::select! {
        res = read_catalog(&mut subscription) => res,
        _ = stopped(&mut stop) => Err(Error::Cancelled),
    };

    match res {
        Ok(catalog) => {
            subscription.close(None).await?;
            Ok(Broadcast { announce, catalog })
        }
        Err(err) => {
            let status = CloseStatus {
                code: config.catalog_error_code,
                reason: err.to_string(),
            };
            if let Err(close_err) = subscription.close(Some(status)).await {
                debug!(err = %close_err, "failed to close catalog subscription");
            }
            Err(err)
        }
    }
}

async fn read_catalog<S: Subscription>(subscription: &mut S) -> Result<Catalog> {
    let mut segment = subscription.data().await?.ok_or(Error::NoCatalogData)?;
    if segment.sequence != 0 {
        return Err(Error::CatalogDelta(segment.sequence));
    }

    let raw = segment.read_all().await?;
    Catalog::decode(&raw)
}
