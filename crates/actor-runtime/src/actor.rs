use futures::stream::StreamExt;
use futures_channel::mpsc;
use protocol::{ActorError, UiEvent};

/// Actor trait for implementing message-driven components
///
/// Actors are independent, stateful components that communicate through
/// message passing. Each actor has its own message queue and processes
/// messages sequentially.
///
/// # Lifecycle
///
/// 1. **init()** - Called once before message processing starts
/// 2. **handle()** - Called for each received message
/// 3. **shutdown()** - Called when the actor is stopping
///
/// # Example
///
/// ```ignore
/// struct MyActor {
///     state: u32,
///     event_tx: mpsc::Sender<UiEvent>,
/// }
///
/// impl Actor for MyActor {
///     type Message = MyMessage;
///
///     fn name(&self) -> &'static str {
///         "MyActor"
///     }
///
///     async fn handle(&mut self, msg: Self::Message) -> Result<(), ActorError> {
///         // Process message
///         Ok(())
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Actor: Send + 'static {
    /// Message type this actor processes
    type Message: Send + 'static;

    /// Actor name (used for logging and debugging)
    fn name(&self) -> &'static str;

    /// Initialize the actor before processing messages
    ///
    /// Called once when the actor starts. Use this to set up resources,
    /// restore state, or perform initial configuration.
    async fn init(&mut self) -> Result<(), ActorError> {
        Ok(())
    }

    /// Handle a single message
    ///
    /// This is called for each message received by the actor.
    /// Messages are processed sequentially in the order received.
    async fn handle(&mut self, msg: Self::Message) -> Result<(), ActorError>;

    /// Clean up before shutdown
    ///
    /// Called when the actor is stopping. Use this to close connections,
    /// save state, or release resources.
    async fn shutdown(&mut self) {}

    /// Main actor run loop (provided by runtime)
    ///
    /// This method consumes the actor and runs it to completion.
    /// It handles initialization, message processing, and shutdown.
    ///
    /// # Arguments
    ///
    /// * `rx` - Channel to receive messages from
    /// * `event_tx` - Channel to send events to UI
    async fn run(mut self, mut rx: mpsc::Receiver<Self::Message>, event_tx: mpsc::Sender<UiEvent>)
    where
        Self: Sized,
    {
        // Initialize
        if let Err(e) = self.init().await {
            let _ = event_tx.clone().try_send(UiEvent::Error {
                message: format!("{} init failed: {}", self.name(), e),
            });
            return;
        }

        crate::actor_debug!("{} started", self.name());

        // Process messages until all senders are dropped
        while let Some(msg) = rx.next().await {
            if let Err(e) = self.handle(msg).await {
                let _ = event_tx.clone().try_send(UiEvent::Error {
                    message: format!("{} error: {}", self.name(), e),
                });
            }
        }

        // Shutdown
        self.shutdown().await;

        crate::actor_debug!("{} stopped", self.name());
    }
}
