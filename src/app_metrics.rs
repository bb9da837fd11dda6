use metrics::{gauge, histogram, increment_counter};

pub struct Metrics;

impl Metrics {
    pub fn c_http_requests_total_incr(labels: metrics_labels::HttpRequests) {
        let labels = [
            ("method", labels.method),
            ("path", labels.path),
            ("status", labels.status),
        ];
        increment_counter!("http_requests_total", &labels);
    }

    pub fn h_http_requests_duration_ms(labels: metrics_labels::HttpRequests, duration_ms: f64) {
        let labels = [
            ("method", labels.method),
            ("path", labels.path),
            ("status", labels.status),
        ];
        histogram!("http_requests_duration_ms", duration_ms, &labels);
    }

    pub fn g_rooms_total_set(rooms_total: usize) {
        gauge!("rooms_total", rooms_total as f64);
    }

    pub fn g_connections_total_set(connections_total: usize) {
        gauge!("connections_total", connections_total as f64);
    }

    pub fn c_players_total_incr() {
        increment_counter!("players_total");
    }

    pub fn c_player_actions_total_incr(labels: metrics_labels::PlayerAction) {
        let labels = [("action", labels.action), ("outcome", labels.outcome)];
        increment_counter!("player_actions_total", &labels);
    }
}

pub mod metrics_labels {
    #[derive(Clone)]
    pub struct HttpRequests {
        pub method: String,
        pub path: String,
        pub status: String,
    }

    pub fn http_requests(method: &str, path: &str, status: u16) -> HttpRequests {
        HttpRequests {
            method: method.to_string(),
            path: path.to_string(),
            status: status.to_string(),
        }
    }

    #[derive(Clone)]
    pub struct PlayerAction {
        pub action: String,
        pub outcome: String,
    }

    pub fn player_action(action: &str, outcome: &str) -> PlayerAction {
        PlayerAction {
            action: action.to_string(),
            outcome: outcome.to_string(),
        }
    }
}
