//! Instructional prompts for completing a draft with a language model.
//!
//! The composer only builds the prompt. Sending it to a generation service
//! is the caller's job.

use crate::reply::context::ReplyContext;
use crate::reply::detect::ReplyType;

/// Build the completion prompt for a draft.
pub fn draft_prompt(ctx: &ReplyContext) -> String {
    let original = format!(
        "From: {}\nSubject: {}\nMessage: {}",
        ctx.original_from, ctx.original_subject, ctx.original_body
    );

    let requirements = match ctx.reply_type {
        ReplyType::InquiryResponse => {
            let mut reqs = format!(
                "\
- Address them as \"{}\"
- Be warm but professional
- Acknowledge their specific inquiry
- Offer to schedule a call or provide more details
- Sign off as \"{}\"
- Keep it concise (3-4 paragraphs max)",
                ctx.sender_first_name, ctx.business_name
            );
            if !ctx.business_contact.is_empty() {
                reqs.push_str(&format!(
                    "\n- Mention they can reach us at {}",
                    ctx.business_contact
                ));
            }
            reqs
        }
        ReplyType::MeetingConfirm => "\
- Confirm availability or suggest alternatives
- Include any prep details if relevant
- Be concise and clear
- Sign off professionally"
            .to_string(),
        ReplyType::SupportResponse => "\
- Acknowledge their question/issue
- Provide clear, helpful information
- Offer further assistance if needed
- Professional and empathetic tone"
            .to_string(),
        ReplyType::Acknowledgment => format!(
            "\
- Address them as \"{}\"
- Confirm what was received or thank them briefly
- Mention any next step only if the message implies one
- Keep it to two or three sentences
- Sign off as \"{}\"",
            ctx.sender_first_name, ctx.business_name
        ),
        ReplyType::General => "\
- Match the tone of the original email
- Be helpful and clear
- Keep it appropriately brief
- Professional sign-off"
            .to_string(),
    };

    format!(
        "\n{}\n\n{original}\n\nRequirements:\n{requirements}\n",
        instruction(ctx.reply_type)
    )
}

fn instruction(reply_type: ReplyType) -> &'static str {
    match reply_type {
        ReplyType::InquiryResponse => {
            "Draft a professional, friendly reply to this business inquiry.\n\
             Be helpful and encourage next steps (call, meeting, more info)."
        }
        ReplyType::MeetingConfirm => "Draft a meeting confirmation/scheduling reply.",
        ReplyType::SupportResponse => "Draft a helpful support response.",
        ReplyType::Acknowledgment => "Draft a short, gracious acknowledgment reply.",
        ReplyType::General => "Draft a professional reply to this email.",
    }
}
