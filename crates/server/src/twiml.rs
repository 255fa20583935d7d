//! TwiML rendering
//!
//! The two response shapes this server ever produces: speak-and-listen
//! and speak-and-hang-up. Spoken text is XML-escaped; everything else
//! is fixed structure, so a template writer beats an XML dependency.

/// Escape text for use inside an XML element
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Speak `say`, then gather the next speech utterance. A silent caller
/// falls through the Gather to the Redirect, which re-enters the
/// webhook with no speech so the agent can re-prompt.
pub fn gather(say: &str, voice: &str, action: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Response>\
         <Gather input=\"speech\" action=\"{action}\" method=\"POST\" speechTimeout=\"auto\">\
         <Say voice=\"{voice}\">{say}</Say>\
         </Gather>\
         <Redirect method=\"POST\">{action}</Redirect>\
         </Response>",
        action = escape(action),
        voice = escape(voice),
        say = escape(say),
    )
}

/// Speak `say`, then hang up
pub fn hangup(say: &str, voice: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Response>\
         <Say voice=\"{voice}\">{say}</Say>\
         <Hangup/>\
         </Response>",
        voice = escape(voice),
        say = escape(say),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_structure() {
        let xml = gather("May I have your name?", "Polly.Joanna", "/voice/gather");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<Gather input=\"speech\" action=\"/voice/gather\""));
        assert!(xml.contains("speechTimeout=\"auto\""));
        assert!(xml.contains("<Say voice=\"Polly.Joanna\">May I have your name?</Say>"));
        assert!(xml.contains("<Redirect method=\"POST\">/voice/gather</Redirect>"));
    }

    #[test]
    fn test_hangup_structure() {
        let xml = hangup("Goodbye.", "Polly.Joanna");
        assert!(xml.contains("<Say voice=\"Polly.Joanna\">Goodbye.</Say>"));
        assert!(xml.contains("<Hangup/>"));
        assert!(!xml.contains("<Gather"));
    }

    #[test]
    fn test_spoken_text_is_escaped() {
        let xml = hangup("Mike's Plumbing & Sons <open>", "Polly.Joanna");
        assert!(xml.contains("Mike&apos;s Plumbing &amp; Sons &lt;open&gt;"));
    }
}
