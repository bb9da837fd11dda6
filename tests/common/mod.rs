pub mod fixtures {
    use super::*;
    use axum_test::TestServer;
    use client::Player;
    use serde_json::{json, Value};
    pub use state::*;

    /// The first name creates the room, the rest join it in order. Every
    /// roster broadcast produced along the way is consumed.
    pub async fn open_room(server: &TestServer, names: &[&str]) -> OpenRoom {
        assert!(!names.is_empty());

        let mut host = client::connect(server).await;
        host.set_display_name(names[0]).await;
        let room_key = host.create_room().await;

        let mut players = vec![host];
        for name in &names[1..] {
            let mut player = client::connect(server).await;
            player.set_display_name(name).await;
            player.join_room(&room_key).await;

            for seated in players.iter_mut() {
                seated.recv_type("playerJoined").await;
            }
            players.push(player);
        }

        OpenRoom {
            room_key,
            names: names.iter().map(|name| name.to_string()).collect(),
            players,
        }
    }

    /// Starts the game and returns each player's dealt hand, in seat order.
    pub async fn start_game(room: &mut OpenRoom) -> Vec<Vec<Value>> {
        room.players[0].send(json!({ "type": "startGame" })).await;

        let mut roster = vec![];
        for player in room.players.iter_mut() {
            let started = player.recv_type("gameStarted").await;
            roster = started["players"].as_array().unwrap().to_vec();
            player.recv_type("updateTurn").await;
        }
        let your_turn = room.players[0].recv_type("yourTurn").await;
        assert_eq!(your_turn["total"], 0);

        room.players
            .iter()
            .map(|player| {
                let view = roster
                    .iter()
                    .find(|view| view["id"] == player.id.as_str())
                    .unwrap();
                view["hand"].as_array().unwrap().to_vec()
            })
            .collect()
    }

    /// Plays `card` for the seat whose turn it is and reads the outcome on
    /// every connection. The played card leaves `hands`, a replacement draw
    /// joins it.
    pub async fn play_turn(
        room: &mut OpenRoom,
        hands: &mut [Vec<Value>],
        current: usize,
        card: Value,
    ) -> Turn {
        let held = hands[current]
            .iter()
            .position(|held| *held == card)
            .expect("card is not in hand");
        hands[current].remove(held);
        room.players[current].play_card(&card).await;

        let mut outcome = Value::Null;
        let mut next = None;
        for (idx, player) in room.players.iter_mut().enumerate() {
            outcome = player.recv_any(&["cardPlayed", "gameOver"]).await;
            if outcome["type"] == "gameOver" && idx == current {
                let mini_game = player.recv().await;
                assert_eq!(mini_game["type"], "startHigherLower");
            }

            let turn = player.recv().await;
            assert_eq!(turn["type"], "updateTurn", "got {turn}");
            next = room.names.iter().position(|name| turn["player"] == name.as_str());
        }

        if outcome["type"] == "cardPlayed" {
            assert_eq!(outcome["card"], card);
            if let Some(drawn) = outcome["newCard"].as_object() {
                assert_eq!(drawn["player"], room.names[current].as_str());
                hands[current].push(drawn["card"].clone());
            }
        }

        Turn {
            outcome,
            next: next.expect("turn went to an unknown player"),
        }
    }

    /// Keeps playing `pick(hand)` from whoever holds the turn until `done`
    /// accepts a turn's outcome. Returns the seat that made that play.
    pub async fn play_until(
        room: &mut OpenRoom,
        hands: &mut [Vec<Value>],
        pick: impl Fn(&[Value]) -> Value,
        done: impl Fn(&Value) -> bool,
    ) -> (usize, Turn) {
        let mut current = 0;
        for _ in 0..60 {
            let card = pick(&hands[current]);
            let turn = play_turn(room, hands, current, card).await;
            if done(&turn.outcome) {
                return (current, turn);
            }
            current = turn.next;
        }

        panic!("Game did not reach the expected play");
    }

    mod state {
        use super::{Player, Value};

        pub struct OpenRoom {
            pub room_key: String,
            pub names: Vec<String>,
            pub players: Vec<Player>,
        }

        pub struct Turn {
            pub outcome: Value,
            pub next: usize,
        }
    }
}

pub mod server {
    use axum_test::{TestServer, TestServerConfig};
    use tracing::info;

    use ninety_nine_server::{config::RoomConfig, telemetry, worker};

    pub fn new_app_server() -> (TestServer, WorkerHandle) {
        new_app_server_with(RoomConfig::default())
    }

    pub fn new_app_server_with(config: RoomConfig) -> (TestServer, WorkerHandle) {
        telemetry::try_init();

        info!("Starting test server");

        let (handle, worker) = worker::spawn_game_worker(config);
        let app = ninety_nine_server::create_application(handle);

        // sockets need a real listener
        let test_server = TestServerConfig::builder()
            .http_transport()
            .build_server(app)
            .unwrap();

        info!("Test server initialized");

        (test_server, WorkerHandle(worker))
    }

    pub struct WorkerHandle(tokio::task::JoinHandle<()>);

    impl WorkerHandle {
        pub async fn abort(self) {
            self.0.abort();
            assert!(self.0.await.unwrap_err().is_cancelled());
        }
    }
}

pub mod client {
    use std::time::Duration;

    use axum_test::{TestServer, TestWebSocket};
    use serde_json::json;

    type Json = serde_json::Value;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    pub struct Player {
        pub id: String,
        pub socket: TestWebSocket,
    }

    pub async fn connect(server: &TestServer) -> Player {
        let mut socket = server.get_websocket("/ws").await.into_websocket().await;

        let connected: Json = socket.receive_json().await;
        assert_eq!(connected["type"], "connected");

        Player {
            id: connected["id"].as_str().unwrap().to_string(),
            socket,
        }
    }

    pub async fn get_stats(server: &TestServer) -> Json {
        let response = server.get("/api/v1/stats").await;
        response.assert_status_ok();
        response.json::<Json>()
    }

    impl Player {
        pub async fn send(&mut self, message: Json) {
            self.socket.send_json(&message).await;
        }

        pub async fn recv(&mut self) -> Json {
            tokio::time::timeout(RECV_TIMEOUT, self.socket.receive_json::<Json>())
                .await
                .expect("timed out waiting for a server message")
        }

        /// Skips ahead to the next message of the given type.
        pub async fn recv_type(&mut self, kind: &str) -> Json {
            loop {
                let message = self.recv().await;
                if message["type"] == kind {
                    return message;
                }
            }
        }

        /// Skips ahead to the next message of any of the given types.
        pub async fn recv_any(&mut self, kinds: &[&str]) -> Json {
            loop {
                let message = self.recv().await;
                if kinds.iter().any(|kind| message["type"] == *kind) {
                    return message;
                }
            }
        }

        /// The next message must be an error; returns its kind.
        pub async fn recv_error(&mut self) -> String {
            let message = self.recv().await;
            assert_eq!(message["type"], "error", "expected an error, got {message}");
            message["kind"].as_str().unwrap().to_string()
        }

        pub async fn set_display_name(&mut self, name: &str) {
            self.send(json!({ "type": "setDisplayName", "name": name }))
                .await;
            let accepted = self.recv().await;
            assert_eq!(accepted["type"], "nameAccepted");
        }

        /// Creates a room and returns its key.
        pub async fn create_room(&mut self) -> String {
            self.send(json!({ "type": "createRoom" })).await;

            let created = self.recv().await;
            assert_eq!(created["type"], "lobbyCreated", "got {created}");
            assert_eq!(created["host"], self.id.as_str());
            self.recv_type("playerJoined").await;

            created["roomKey"].as_str().unwrap().to_string()
        }

        /// Joins a room and returns the `joinSuccess` payload.
        pub async fn join_room(&mut self, room_key: &str) -> Json {
            self.send(json!({ "type": "joinRoom", "roomKey": room_key }))
                .await;

            let joined = self.recv().await;
            assert_eq!(joined["type"], "joinSuccess", "got {joined}");
            self.recv_type("playerJoined").await;
            joined
        }

        pub async fn play_card(&mut self, card: &Json) {
            self.send(json!({ "type": "playCard", "card": card })).await;
        }

        pub async fn restart_game(&mut self) {
            self.send(json!({ "type": "restartGame" })).await;
        }

        pub async fn higher_lower_complete(&mut self) {
            self.send(json!({ "type": "higherLowerComplete" })).await;
        }

        pub async fn close(self) {
            self.socket.close().await;
        }
    }
}
