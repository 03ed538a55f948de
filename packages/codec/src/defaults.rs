//! Starter content for a newly added channel

use elemental_proto::{ActionNode, Channel, ChannelNode, ContentNode, ImageNode, TextNode};

/// The fixed node sequence a fresh channel starts with
pub fn channel_defaults(channel: Channel) -> Vec<ContentNode> {
    match channel {
        Channel::Email => vec![
            ContentNode::Text(TextNode::plain("").with_attr("text_style", "h1")),
            ContentNode::text(""),
            ContentNode::Image(ImageNode::default()),
        ],
        Channel::Sms | Channel::Slack | Channel::Msteams => vec![ContentNode::text("")],
        Channel::Push => vec![ContentNode::meta(""), ContentNode::text("")],
        Channel::Inbox => vec![
            ContentNode::meta(""),
            ContentNode::text(""),
            ContentNode::Action(ActionNode {
                content: "Click here".to_string(),
                ..Default::default()
            }),
        ],
    }
}

pub fn default_channel_node(channel: Channel) -> ChannelNode {
    ChannelNode::new(channel, channel_defaults(channel))
}
