//! Cross-component scenarios: bootstrap, push channels, services and logout
//! running against a mocked REST API and scripted sockets.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rally_domain::{
    ChatMessage, ConversationId, MessageId, PresenceStatus, Profile, UserId, UserSummary,
};
use rally_shared::{
    BootstrapPayload, ChatFrame, NotificationFrame, WireConversation, WireMember, WireUser,
};

use crate::client::RallyClient;
use crate::config::ClientConfig;
use crate::infrastructure::testing::fixtures::{self, FixedClock};
use crate::infrastructure::testing::{ScriptedSocket, ScriptedTransport};
use crate::ports::outbound::MockSocialApi;
use crate::state::{ChannelKind, MessagesSlice, NotificationsSlice, SessionSlice, SocialSlice};

const CHAT: &str = "/ws/chat";
const NOTIFICATIONS: &str = "/ws/notifications";

fn config() -> ClientConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("RALLY_API_URL", "http://rally.test/"),
        ("RALLY_CHAT_WS_URL", "ws://rally.test/ws/chat"),
        ("RALLY_NOTIFICATIONS_WS_URL", "ws://rally.test/ws/notifications"),
        ("RALLY_AUTH_TOKEN", "token-123"),
        ("RALLY_RECONNECT_INITIAL_MS", "5"),
        ("RALLY_RECONNECT_MAX_MS", "20"),
        ("RALLY_RECONNECT_MAX_ATTEMPTS", "2"),
        ("RALLY_SEARCH_DEBOUNCE_MS", "5"),
    ]);
    ClientConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).expect("config")
}

fn profile(id: UserId) -> Profile {
    Profile {
        id,
        username: "me".into(),
        display_name: "Me".into(),
        bio: String::new(),
        avatar: None,
        rank: 1,
    }
}

/// REST mock serving a bootstrap with the given online friends.
fn api(me: UserId, friends: &[UserSummary], conversations: Vec<WireConversation>) -> MockSocialApi {
    let payload = BootstrapPayload {
        profile: profile(me),
        game_history: Vec::new(),
        game_stats: Default::default(),
        achievements: Vec::new(),
        friends: friends
            .iter()
            .map(|f| WireUser {
                status: Some(PresenceStatus::Online),
                ..WireUser::from(f)
            })
            .collect(),
        friend_requests: Default::default(),
    };
    let online = friends.len() as u32 + 1;

    let mut api = MockSocialApi::new();
    api.expect_fetch_bootstrap()
        .returning(move || Ok(payload.clone()));
    api.expect_fetch_online_count()
        .returning(move || Ok(online));
    api.expect_fetch_conversations()
        .returning(move || Ok(conversations.clone()));
    api.expect_fetch_tournaments().returning(|| Ok(Vec::new()));
    api.expect_fetch_achievement_catalogue()
        .returning(|| Ok(Vec::new()));
    api
}

struct Harness {
    client: RallyClient,
    transport: Arc<ScriptedTransport>,
    chat: ScriptedSocket,
    notifications: ScriptedSocket,
}

fn harness(api: MockSocialApi) -> Harness {
    let transport = Arc::new(ScriptedTransport::new());
    let chat = transport.socket(CHAT);
    let notifications = transport.socket(NOTIFICATIONS);
    let client = RallyClient::new(
        &config(),
        Arc::new(api),
        transport.clone(),
        Arc::new(FixedClock::epoch()),
    );
    Harness {
        client,
        transport,
        chat,
        notifications,
    }
}

fn frame<T: serde::Serialize>(frame: &T) -> serde_json::Value {
    serde_json::to_value(frame).expect("frame serializes")
}

fn social(client: &RallyClient) -> Arc<SocialSlice> {
    client.store().get::<SocialSlice>().expect("social slice")
}

#[tokio::test]
async fn presence_and_friend_acceptance_converge() {
    let me = UserId::new();
    let f = fixtures::user("fay");
    let g = fixtures::user("gus");
    let g_id = g.id;

    let mut api = api(me, std::slice::from_ref(&f), Vec::new());
    api.expect_send_friend_request()
        .withf(move |id| *id == g_id)
        .times(1)
        .returning(|_| Ok(()));
    api.expect_online_status()
        .withf(move |id| *id == g_id)
        .returning(|_| Ok(true));
    let h = harness(api);

    h.client.session.bootstrap(me).await.expect("bootstrap");
    assert!(h
        .client
        .store()
        .get::<SessionSlice>()
        .expect("session")
        .is_ready());

    let went_offline = NotificationFrame::StatusUpdate {
        user: WireUser {
            status: Some(PresenceStatus::Offline),
            ..WireUser::id_only(f.id)
        },
    };
    assert!(h.notifications.send_json(&frame(&went_offline)));
    assert!(
        fixtures::eventually(|| social(&h.client)
            .friend(f.id)
            .is_some_and(|friend| friend.status == PresenceStatus::Offline))
        .await
    );

    h.client.friends.send_request(g.id).await.expect("sent");
    assert_eq!(social(&h.client).friend_requests.sent.len(), 1);

    let accepted = NotificationFrame::FriendRequestAccepted {
        user: WireUser::from(&g),
    };
    assert!(h.notifications.send_json(&frame(&accepted)));
    assert!(fixtures::eventually(|| social(&h.client).friends.len() == 2).await);

    let social = social(&h.client);
    let friends: Vec<_> = social
        .friends
        .iter()
        .map(|friend| (friend.user.clone(), friend.status))
        .collect();
    assert_eq!(
        friends,
        vec![(f, PresenceStatus::Offline), (g, PresenceStatus::Online)]
    );
    assert!(social.friend_requests.sent.is_empty());

    let urls = h.transport.connected_urls();
    assert!(urls
        .iter()
        .all(|url| url.query() == Some("token=token-123")));

    h.client.session.logout();
}

#[tokio::test]
async fn pushed_echo_of_a_sent_message_is_not_duplicated() {
    let me = UserId::new();
    let f = fixtures::user("fay");
    let conversation_id = ConversationId::new();
    let conversation = WireConversation {
        id: conversation_id,
        members: vec![WireMember { user_id: me }, WireMember { user_id: f.id }],
        messages: Vec::new(),
        unread_count: 0,
        last_message: None,
    };
    let mut api = api(me, std::slice::from_ref(&f), vec![conversation]);
    api.expect_send_message().times(1).returning(|_| Ok(()));
    let h = harness(api);
    h.client.session.bootstrap(me).await.expect("bootstrap");

    let sent_id = h
        .client
        .messaging
        .send_message(f.id, "good game")
        .await
        .expect("sent");

    let echo = ChatMessage {
        id: sent_id,
        conversation_id,
        sender_id: me,
        receiver_id: f.id,
        content: "good game".into(),
        created_at: fixtures::at(1_700_000_000),
    };
    let reply = ChatMessage {
        id: MessageId::new(),
        conversation_id,
        sender_id: f.id,
        receiver_id: me,
        content: "rematch?".into(),
        created_at: fixtures::at(1_700_000_005),
    };
    assert!(h.chat.send_json(&frame(&ChatFrame::NewMessage(echo))));
    assert!(h.chat.send_json(&frame(&ChatFrame::NewMessage(reply.clone()))));

    let store = h.client.store().clone();
    assert!(
        fixtures::eventually(|| store
            .get::<MessagesSlice>()
            .and_then(|m| m.conversation(conversation_id).map(|c| c.contains_message(reply.id)))
            .unwrap_or(false))
        .await
    );
    let messages = store.get::<MessagesSlice>().expect("messages");
    let conversation = messages.conversation(conversation_id).expect("conversation");
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.unread_count, 1);
    assert_eq!(messages.unread_count, 1);

    h.client.session.logout();
}

#[tokio::test]
async fn frames_after_logout_never_reach_the_store() {
    let me = UserId::new();
    let stranger = fixtures::user("sam");
    let h = harness(api(me, &[], Vec::new()));
    h.client.session.bootstrap(me).await.expect("bootstrap");
    assert!(
        fixtures::eventually(|| h
            .client
            .channels
            .handle(ChannelKind::Notifications)
            .is_some_and(|handle| handle.state.is_open()))
        .await
    );

    h.client.session.logout();
    let late = NotificationFrame::FriendRequestReceived {
        user: WireUser::from(&stranger),
        request_id: None,
        created_at: None,
    };
    h.notifications.send_json(&frame(&late));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let store = h.client.store();
    assert!(!store.is_initialized::<SocialSlice>());
    assert!(!store.is_initialized::<NotificationsSlice>());
    assert!(!h.client.reconnect(ChannelKind::Notifications));
}
