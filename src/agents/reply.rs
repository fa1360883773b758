use crate::constants::{DELEGATE_MARKER, FINAL_ANSWER_MARKER, TOOL_REQUEST_MARKER};

/// What an agent asked for in one LLM reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    /// The agent is done; carries everything after the final-answer marker
    Final(String),
    /// The agent wants to call one of its tools
    ToolRequest { tool: String, query: String },
    /// The agent wants a coworker to answer a question
    Delegate { coworker: String, question: String },
}

/// Parses an agent reply. Whichever marker appears first wins.
pub fn parse_reply(resp: &str) -> Option<AgentReply> {
    let mut candidates: Vec<(usize, AgentReply)> = Vec::new();

    if let Some(pos) = resp.find(FINAL_ANSWER_MARKER) {
        let answer = resp[pos + FINAL_ANSWER_MARKER.len()..].trim().to_string();
        if !answer.is_empty() {
            candidates.push((pos, AgentReply::Final(answer)));
        }
    }

    let mut offset = 0;
    for line in resp.split_inclusive('\n') {
        let trimmed = line.trim();
        let line_pos = offset + (line.len() - line.trim_start().len());
        offset += line.len();

        if let Some(rest) = trimmed.strip_prefix(TOOL_REQUEST_MARKER) {
            let rest = rest.trim();
            if let Some((tool, query)) = rest.split_once(char::is_whitespace) {
                let query = query.trim();
                if !query.is_empty() {
                    candidates.push((
                        line_pos,
                        AgentReply::ToolRequest {
                            tool: tool.to_string(),
                            query: query.to_string(),
                        },
                    ));
                    break;
                }
            }
        } else if let Some(rest) = trimmed.strip_prefix(DELEGATE_MARKER) {
            if let Some((coworker, question)) = rest.split_once('|') {
                let (coworker, question) = (coworker.trim(), question.trim());
                if !coworker.is_empty() && !question.is_empty() {
                    candidates.push((
                        line_pos,
                        AgentReply::Delegate {
                            coworker: coworker.to_string(),
                            question: question.to_string(),
                        },
                    ));
                    break;
                }
            }
        }
    }

    candidates
        .into_iter()
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, reply)| reply)
}

/// Validates that the reply follows the agent protocol
pub fn is_well_formed(resp: &str) -> bool {
    parse_reply(resp).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_final_answer() {
        let reply = parse_reply("Thought: done.\nFinal Answer: ```json\n{}\n```").unwrap();
        assert_eq!(reply, AgentReply::Final("```json\n{}\n```".to_string()));
    }

    #[test]
    fn parses_tool_request() {
        let reply = parse_reply("I need the spec.\nTOOL_REQUEST: spec_search banner object fields").unwrap();
        assert_eq!(
            reply,
            AgentReply::ToolRequest {
                tool: "spec_search".to_string(),
                query: "banner object fields".to_string(),
            }
        );
    }

    #[test]
    fn parses_delegation() {
        let reply = parse_reply("DELEGATE: Dependency Map Agent | Which objects need a device?").unwrap();
        assert_eq!(
            reply,
            AgentReply::Delegate {
                coworker: "Dependency Map Agent".to_string(),
                question: "Which objects need a device?".to_string(),
            }
        );
    }

    #[test]
    fn earliest_marker_wins() {
        let reply = parse_reply("TOOL_REQUEST: web_search openrtb\nFinal Answer: guess").unwrap();
        assert!(matches!(reply, AgentReply::ToolRequest { .. }));

        let reply = parse_reply("Final Answer: see below\nTOOL_REQUEST: web_search x").unwrap();
        assert!(matches!(reply, AgentReply::Final(_)));
    }

    #[test]
    fn rejects_unstructured_or_incomplete_replies() {
        assert!(!is_well_formed("Sure, here is some text."));
        assert!(!is_well_formed("TOOL_REQUEST: spec_search"));
        assert!(!is_well_formed("DELEGATE: nobody"));
        assert!(!is_well_formed("Final Answer:   "));
    }
}
