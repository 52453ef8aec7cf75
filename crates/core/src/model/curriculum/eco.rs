//! Built-in PMP Examination Content Outline dataset.
//!
//! Static curriculum content; ids are stable and referenced by persisted
//! progress records, so they must never be renumbered.

use super::{Curriculum, Domain, Enabler, Task};
use crate::model::ids::{DomainId, EnablerId, TaskId};

fn enabler(id: &str, description: &str, hook: &str) -> Enabler {
    Enabler::new(EnablerId::new(id), description, Some(hook.to_owned()))
        .expect("builtin enabler is well-formed")
}

fn task(id: &str, name: &str, hook: &str, enablers: Vec<Enabler>) -> Task {
    Task::new(TaskId::new(id), name, Some(hook.to_owned()), enablers)
        .expect("builtin task is well-formed")
}

fn domain(
    id: &str,
    name: &str,
    description: &str,
    color: &str,
    coverage: u8,
    tasks: Vec<Task>,
) -> Domain {
    Domain::new(DomainId::new(id), name, description, color, coverage, tasks)
        .expect("builtin domain is well-formed")
}

#[must_use]
pub(super) fn builtin() -> Curriculum {
    Curriculum::new(vec![people(), process(), business()])
}

fn people() -> Domain {
    domain(
        "people",
        "People",
        "Focuses on the skills and activities associated with effectively leading a project team.",
        "indigo",
        33,
        vec![
            task(
                "p1",
                "Develop a common vision",
                "One North Star",
                vec![
                    enabler(
                        "p1-1",
                        "Help ensure a shared vision with key stakeholders",
                        "Stakeholder Buy-in",
                    ),
                    enabler("p1-2", "Promote the shared vision", "Be the Evangelist"),
                    enabler("p1-3", "Keep the vision current", "Vision Check-up"),
                    enabler(
                        "p1-4",
                        "Break down situations to identify root cause of misunderstanding",
                        "5-Whys Method",
                    ),
                ],
            ),
            task(
                "p2",
                "Manage conflicts",
                "EDUCE: Evaluate, Define, Understand, Choose, Execute",
                vec![
                    enabler("p2-1", "Identify conflict sources", "Trace the Spark"),
                    enabler("p2-2", "Analyze the context for the conflict", "Context is King"),
                    enabler(
                        "p2-3",
                        "Implement an agreed-on resolution strategy",
                        "Collaborate > Force",
                    ),
                    enabler(
                        "p2-4",
                        "Communicate conflict management principles",
                        "Transparent Ground Rules",
                    ),
                    enabler("p2-5", "Establish ground rules environment", "Safety First"),
                    enabler("p2-6", "Manage and rectify violations", "Swift & Private"),
                ],
            ),
            task(
                "p3",
                "Lead the project team",
                "Servant Leadership: Lead by Serving",
                vec![
                    enabler("p3-1", "Establish expectations at team level", "Social Contract"),
                    enabler("p3-2", "Empower the team", "Trust over Micro-mgmt"),
                    enabler("p3-3", "Solve problems", "Blocker Removal"),
                    enabler("p3-4", "Represent voice of team", "Team Shield"),
                    enabler(
                        "p3-5",
                        "Support team's varied experiences, skills, perspectives",
                        "Diversity = Strength",
                    ),
                    enabler("p3-6", "Determine appropriate leadership style", "Situational Flex"),
                    enabler(
                        "p3-7",
                        "Establish clear roles and responsibilities",
                        "RACI Clarity",
                    ),
                ],
            ),
            task(
                "p4",
                "Engage stakeholders",
                "Engage, Don't Just Manage",
                vec![
                    enabler("p4-1", "Identify stakeholders", "Cast a Wide Net"),
                    enabler("p4-2", "Analyze stakeholders", "Power/Interest Grid"),
                    enabler(
                        "p4-3",
                        "Tailor communication to stakeholder needs",
                        "Personalized Push/Pull",
                    ),
                    enabler(
                        "p4-4",
                        "Execute stakeholder engagement plan",
                        "Consistency counts",
                    ),
                    enabler(
                        "p4-5",
                        "Optimize alignment among needs/expectations/objectives",
                        "WIIFM: What's In It For Me?",
                    ),
                    enabler(
                        "p4-6",
                        "Build trust and influence stakeholders",
                        "Emotional Intelligence",
                    ),
                ],
            ),
        ],
    )
}

fn process() -> Domain {
    domain(
        "process",
        "Process",
        "Reinforces the technical aspects of managing a project to deliver business value.",
        "sky",
        41,
        vec![
            task(
                "pr1",
                "Develop integrated project management plan",
                "One Plan to Rule Them All",
                vec![
                    enabler(
                        "pr1-1",
                        "Assess project needs, complexity, magnitude",
                        "Tailoring Start",
                    ),
                    enabler("pr1-2", "Recommend development approach", "Agile vs Predictive?"),
                ],
            ),
            task(
                "pr3",
                "Help ensure value-based delivery",
                "Value = Outcome, not Output",
                vec![
                    enabler(
                        "pr3-1",
                        "Identify value components with stakeholders",
                        "What is Success?",
                    ),
                    enabler(
                        "pr3-2",
                        "Prioritize work based on value and feedback",
                        "MoSCoW Method",
                    ),
                    enabler(
                        "pr3-3",
                        "Assess opportunities to deliver value incrementally",
                        "MVP thinking",
                    ),
                ],
            ),
        ],
    )
}

fn business() -> Domain {
    domain(
        "business",
        "Business Environment",
        "Highlights the connection between projects and organizational strategy.",
        "emerald",
        26,
        vec![
            task(
                "be3",
                "Manage and control changes",
                "Change is Constant; Control is Vital",
                vec![
                    enabler("be3-1", "Execute change control process", "CCB Review"),
                    enabler(
                        "be3-2",
                        "Communicate status of proposed changes",
                        "Status Feedback",
                    ),
                ],
            ),
            task(
                "be5",
                "Plan and manage risk",
                "Risk is Uncertainty that Matters",
                vec![
                    enabler("be5-1", "Identify risks", "Think: What If?"),
                    enabler("be5-2", "Analyze risks", "Qual vs Quant"),
                    enabler("be5-3", "Monitor and control risks", "Keep the Register Alive"),
                ],
            ),
        ],
    )
}
