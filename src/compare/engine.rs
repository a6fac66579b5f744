use std::collections::HashSet;

use tracing::{debug, info};

use crate::compare::context::{ComparisonContext, Role};
use crate::compare::graft::{Grafter, IdMap};
use crate::compare::report::{ComparisonReport, Difference, MergeSummary, PairReport, PersonRef};
use crate::compare::{CompareConfig, CompareError};
use crate::core::event::{Event, EventKind, EventSummary};
use crate::core::family::Family;
use crate::core::individual::Individual;
use crate::core::record::Record;
use crate::core::types::Side;
use crate::matching::engine::{match_records, MatchedPair};
use crate::matching::scoring::{event_score, family_score, individual_score, is_similar, names_similar};
use crate::store::Gedcom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Record which source records correspond to which destination records
    Identity,
    /// Report differences and graft
    Report,
}

/// An event recorded on one side only, detached from its store
struct OneSidedEvent {
    side: Side,
    summary: EventSummary,
    record: Record,
}

impl OneSidedEvent {
    fn new(side: Side, event: &Event<'_>) -> Self {
        Self {
            side,
            summary: event.summary(),
            record: event.record.clone(),
        }
    }
}

/// Outcome of comparing one pair
struct Visit {
    report: Option<PairReport>,
    /// Matched relatives still to compare, in order
    next: Vec<ComparisonContext>,
}

/// Compares (and optionally merges) two trees from a pair of root individuals
pub struct GedcomCompare<'a> {
    left: &'a mut Gedcom,
    right: &'a mut Gedcom,
    config: CompareConfig,
    ids: IdMap,
    summary: MergeSummary,
}

impl<'a> GedcomCompare<'a> {
    pub fn new(left: &'a mut Gedcom, right: &'a mut Gedcom, config: CompareConfig) -> Self {
        Self {
            left,
            right,
            config,
            ids: IdMap::new(),
            summary: MergeSummary::default(),
        }
    }

    /// Walk both trees from the given roots, reporting and (if configured) merging.
    ///
    /// # Errors
    ///
    /// Returns `CompareError::MissingRoot` if either root is not an individual
    /// in its tree; neither tree is modified in that case.
    pub fn compare_from(
        mut self,
        left_root: &str,
        right_root: &str,
    ) -> Result<ComparisonReport, CompareError> {
        if self.left.individual(left_root).is_none() {
            return Err(CompareError::MissingRoot {
                side: Side::Left,
                id: left_root.to_string(),
            });
        }
        if self.right.individual(right_root).is_none() {
            return Err(CompareError::MissingRoot {
                side: Side::Right,
                id: right_root.to_string(),
            });
        }

        let root = ComparisonContext::root(left_root, right_root);
        if self.merge_side().is_some() {
            self.traverse(root.clone(), Pass::Identity);
            debug!(mapped = self.ids.len(), "Identity pass complete");
        }
        let pairs = self.traverse(root, Pass::Report);

        if let Some(side) = self.merge_side() {
            info!(
                from = %side,
                individuals = self.summary.individuals,
                families = self.summary.families,
                notes = self.summary.notes,
                sources = self.summary.sources,
                events = self.summary.events,
                "Merge complete"
            );
        }

        Ok(ComparisonReport {
            merge_source: self.config.merge,
            pairs,
            merge: self.summary,
        })
    }

    fn merge_side(&self) -> Option<Side> {
        self.config.merge.side()
    }

    fn stores(&self) -> (&Gedcom, &Gedcom) {
        (&*self.left, &*self.right)
    }

    fn grafter(&mut self, source: Side) -> Grafter<'_> {
        let (source, dest): (&Gedcom, &mut Gedcom) = match source {
            Side::Left => (&*self.left, &mut *self.right),
            Side::Right => (&*self.right, &mut *self.left),
        };
        Grafter::new(source, dest, &mut self.ids, &mut self.summary)
    }

    fn traverse(&mut self, root: ComparisonContext, pass: Pass) -> Vec<PairReport> {
        let mut compared: HashSet<(String, String)> = HashSet::new();
        let mut stack = vec![root];
        let mut reports = Vec::new();

        while let Some(ctx) = stack.pop() {
            let (Some(left), Some(right)) = (ctx.left, ctx.right) else {
                continue;
            };
            if !compared.insert((left.clone(), right.clone())) {
                continue;
            }
            let Some(visit) = self.visit(&left, &right, pass) else {
                continue;
            };
            reports.extend(visit.report);
            // Reversed so the first relative is compared next
            stack.extend(visit.next.into_iter().rev());
        }
        reports
    }

    fn visit(&mut self, left: &str, right: &str, pass: Pass) -> Option<Visit> {
        let (left_ref, right_ref, last_names) = {
            let (ls, rs) = self.stores();
            let l = ls.individual(left)?;
            let r = rs.individual(right)?;
            let last_names = match (l.last_name(), r.last_name()) {
                (Some(a), Some(b)) if !is_similar(a, b) => Some((a.to_string(), b.to_string())),
                _ => None,
            };
            (PersonRef::from(&l), PersonRef::from(&r), last_names)
        };
        let mut report = PairReport::new(left_ref, right_ref);

        if let Some((a, b)) = last_names {
            debug!(left, right, "Last names differ, not comparing relatives");
            report.differences.push(Difference::LastNameMismatch { left: a, right: b });
            return Some(Visit {
                report: (pass == Pass::Report).then_some(report),
                next: Vec::new(),
            });
        }

        let diffs = &mut report.differences;
        match pass {
            Pass::Identity => self.record_identity(left, right),
            Pass::Report => {
                let (l, r) = (report.left.name.clone(), report.right.name.clone());
                if (l.is_some() || r.is_some()) && !names_similar(l.as_deref(), r.as_deref()) {
                    diffs.push(Difference::NameMismatch { left: l, right: r });
                }
                for kind in [EventKind::Birth, EventKind::Death] {
                    self.compare_event(kind, Some(left), Some(right), diffs);
                }
                for kind in [EventKind::Census, EventKind::Residence] {
                    self.compare_event_lists(kind, left, right, diffs);
                }
            }
        }

        let mut contexts = self.parent_contexts(left, right);
        for row in self.match_families(left, right) {
            contexts.extend(self.family_row(row, left, right, pass, diffs));
        }
        let next = self.resolve_relatives(contexts, pass, diffs);

        Some(Visit {
            report: (pass == Pass::Report).then_some(report),
            next,
        })
    }

    /// Remember that `left` and `right` are the same record, keyed by the merge source
    fn record_identity(&mut self, left: &str, right: &str) {
        if let Some(side) = self.merge_side() {
            let (source, dest) = side.pick((left, right), (right, left));
            self.ids.insert(source, dest);
        }
    }

    /// Compare the first event of `kind` owned by each side's record
    fn compare_event(
        &mut self,
        kind: EventKind,
        left_owner: Option<&str>,
        right_owner: Option<&str>,
        diffs: &mut Vec<Difference>,
    ) {
        let one_sided = {
            let (ls, rs) = self.stores();
            let l = left_owner.and_then(|id| ls.get(id)).and_then(|r| first_event(r, kind));
            let r = right_owner.and_then(|id| rs.get(id)).and_then(|r| first_event(r, kind));
            match (l, r) {
                (Some(l), Some(r)) => {
                    if !l.matches(&r) {
                        diffs.push(Difference::EventMismatch {
                            kind,
                            left: l.summary(),
                            right: r.summary(),
                        });
                    }
                    None
                }
                (Some(l), None) => Some(OneSidedEvent::new(Side::Left, &l)),
                (None, Some(r)) => Some(OneSidedEvent::new(Side::Right, &r)),
                (None, None) => None,
            }
        };

        if let Some(event) = one_sided {
            let dest_owner = event.side.opposite().pick(left_owner, right_owner);
            self.event_one_sided(kind, event, dest_owner, diffs);
        }
    }

    /// Pair up repeatable events (census, residence) and report the unpaired ones
    fn compare_event_lists(
        &mut self,
        kind: EventKind,
        left: &str,
        right: &str,
        diffs: &mut Vec<Difference>,
    ) {
        let unpaired: Vec<OneSidedEvent> = {
            let (ls, rs) = self.stores();
            let l = ls.individual(left).map(|i| i.events(kind)).unwrap_or_default();
            let r = rs.individual(right).map(|i| i.events(kind)).unwrap_or_default();
            match_records(&l, &r, |a, b| event_score(&a, &b))
                .into_iter()
                .filter_map(|row| match (row.left, row.right) {
                    (Some(e), None) => Some(OneSidedEvent::new(Side::Left, &e)),
                    (None, Some(e)) => Some(OneSidedEvent::new(Side::Right, &e)),
                    _ => None,
                })
                .collect()
        };

        for event in unpaired {
            let dest_owner = event.side.opposite().pick(left, right);
            self.event_one_sided(kind, event, Some(dest_owner), diffs);
        }
    }

    fn event_one_sided(
        &mut self,
        kind: EventKind,
        event: OneSidedEvent,
        dest_owner: Option<&str>,
        diffs: &mut Vec<Difference>,
    ) {
        let grafted = match dest_owner {
            Some(owner) if self.merge_side() == Some(event.side) => {
                self.grafter(event.side).event(&event.record, owner)
            }
            _ => false,
        };
        diffs.push(Difference::EventOneSided {
            kind,
            side: event.side,
            event: event.summary,
            grafted,
        });
    }

    /// Father and mother contexts from each side's parent family
    fn parent_contexts(&self, left: &str, right: &str) -> Vec<ComparisonContext> {
        let (ls, rs) = self.stores();
        let lf = parent_family(ls, left);
        let rf = parent_family(rs, right);
        let (lf_id, rf_id) = (lf.map(|f| f.id()), rf.map(|f| f.id()));

        vec![
            ComparisonContext::relative(
                Role::Father,
                lf.and_then(|f| f.husband()),
                rf.and_then(|f| f.husband()),
            )
            .with_focal(left, right)
            .with_families(lf_id, rf_id),
            ComparisonContext::relative(
                Role::Mother,
                lf.and_then(|f| f.wife()),
                rf.and_then(|f| f.wife()),
            )
            .with_focal(left, right)
            .with_families(lf_id, rf_id),
        ]
    }

    /// Pair the spouse families of the two individuals
    fn match_families(&self, left: &str, right: &str) -> Vec<MatchedPair<String>> {
        let (ls, rs) = self.stores();
        let lf = spouse_families(ls, left);
        let rf = spouse_families(rs, right);
        let weights = self.config.weights;

        match_records(&lf, &rf, |a, b| family_score(ls, &a, rs, &b, &weights))
            .into_iter()
            .map(|row| MatchedPair {
                left: row.left.map(|f| f.id().to_string()),
                right: row.right.map(|f| f.id().to_string()),
            })
            .collect()
    }

    /// Compare one row of paired spouse families and return the spouse and child contexts
    fn family_row(
        &mut self,
        row: MatchedPair<String>,
        left: &str,
        right: &str,
        pass: Pass,
        diffs: &mut Vec<Difference>,
    ) -> Vec<ComparisonContext> {
        let (lf, rf) = match (row.left, row.right) {
            (Some(lf), Some(rf)) => (lf, rf),
            (lf, rf) => return self.one_sided_family(lf, rf, left, right, pass, diffs),
        };

        match pass {
            Pass::Identity => self.record_identity(&lf, &rf),
            Pass::Report => {
                self.compare_event(EventKind::Marriage, Some(lf.as_str()), Some(rf.as_str()), diffs);
            }
        }
        self.family_contexts(Some(lf.as_str()), Some(rf.as_str()), left, right)
    }

    fn one_sided_family(
        &mut self,
        lf: Option<String>,
        rf: Option<String>,
        left: &str,
        right: &str,
        pass: Pass,
        diffs: &mut Vec<Difference>,
    ) -> Vec<ComparisonContext> {
        let side = if lf.is_some() { Side::Left } else { Side::Right };

        if pass == Pass::Report && self.merge_side() == Some(side) {
            let family = side.pick(&lf, &rf).clone();
            let focal_source = side.pick(left, right);
            let focal_dest = side.opposite().pick(left, right);
            let grafted = family.and_then(|family| {
                let copy = self.grafter(side).family(&family, focal_source, focal_dest)?;
                Some(side.pick((family.clone(), copy.clone()), (copy, family)))
            });
            if let Some((lf, rf)) = grafted {
                self.compare_event(EventKind::Marriage, Some(lf.as_str()), Some(rf.as_str()), diffs);
                return self.family_contexts(Some(lf.as_str()), Some(rf.as_str()), left, right);
            }
        }

        if pass == Pass::Report {
            self.compare_event(EventKind::Marriage, lf.as_deref(), rf.as_deref(), diffs);
        }
        self.family_contexts(lf.as_deref(), rf.as_deref(), left, right)
    }

    /// Husband and wife contexts, plus paired children when both families exist
    fn family_contexts(
        &self,
        lf: Option<&str>,
        rf: Option<&str>,
        left: &str,
        right: &str,
    ) -> Vec<ComparisonContext> {
        let (ls, rs) = self.stores();
        let l = lf.and_then(|id| ls.family(id));
        let r = rf.and_then(|id| rs.family(id));

        let mut contexts = vec![
            ComparisonContext::relative(
                Role::Husband,
                l.and_then(|f| f.husband()),
                r.and_then(|f| f.husband()),
            ),
            ComparisonContext::relative(Role::Wife, l.and_then(|f| f.wife()), r.and_then(|f| f.wife())),
        ];

        if let (Some(l), Some(r)) = (l, r) {
            let lc = children(ls, &l);
            let rc = children(rs, &r);
            let weights = self.config.weights;
            for row in match_records(&lc, &rc, |a, b| individual_score(&a, &b, &weights)) {
                contexts.push(ComparisonContext::relative(
                    Role::Child,
                    row.left.map(|c| c.id()),
                    row.right.map(|c| c.id()),
                ));
            }
        }

        contexts
            .into_iter()
            .map(|ctx| ctx.with_focal(left, right).with_families(lf, rf))
            .collect()
    }

    /// Report (and graft) one-sided relatives; return the pairs to compare next
    fn resolve_relatives(
        &mut self,
        contexts: Vec<ComparisonContext>,
        pass: Pass,
        diffs: &mut Vec<Difference>,
    ) -> Vec<ComparisonContext> {
        let mut next = Vec::new();
        for ctx in contexts {
            if ctx.is_matched() {
                next.push(ctx);
                continue;
            }
            let Some(side) = ctx.one_sided() else {
                continue;
            };
            if pass == Pass::Identity || ctx.is_focal(side) {
                continue;
            }

            let person = {
                let store = side.pick(&*self.left, &*self.right);
                ctx.candidate(side)
                    .and_then(|id| store.individual(id))
                    .map(|i| PersonRef::from(&i))
            };
            let Some(person) = person else {
                continue;
            };

            let grafted_as = if self.merge_side() == Some(side) {
                self.graft_relative(&ctx, side)
            } else {
                None
            };
            diffs.push(Difference::RelativeOneSided {
                role: ctx.role,
                side,
                person,
                grafted_as: grafted_as.clone(),
            });
            if let Some(id) = grafted_as {
                next.push(ctx.with_candidate(side.opposite(), id));
            }
        }
        next
    }

    /// Copy (or resolve) the relative on `side` into the other tree and link it
    /// to the focal individual. Nothing is copied when the link cannot be made.
    fn graft_relative(&mut self, ctx: &ComparisonContext, side: Side) -> Option<String> {
        let source_id = ctx.candidate(side)?;
        let focal = ctx.focal(side.opposite())?;
        let dest_family = ctx.family(side.opposite());
        let source_family = ctx.family(side);

        let mut grafter = self.grafter(side);
        let linkable = match ctx.role {
            Role::Father | Role::Mother => {
                grafter.can_link_parent(focal, source_id, source_family, ctx.role)
            }
            Role::Husband | Role::Wife => {
                dest_family.is_some_and(|f| grafter.can_link_spouse(f, source_id, ctx.role))
            }
            Role::Child => dest_family.is_some_and(|f| grafter.has_family(f)),
            Role::Root => false,
        };
        if !linkable {
            debug!(role = %ctx.role, source = source_id, focal, "Cannot link relative, not grafting");
            return None;
        }

        let dest_id = grafter.individual(source_id)?;
        let linked = match (ctx.role, dest_family) {
            (Role::Father | Role::Mother, _) => {
                grafter.link_parent(focal, &dest_id, source_family, ctx.role)
            }
            (Role::Husband | Role::Wife, Some(family)) => {
                grafter.link_spouse(family, &dest_id, ctx.role)
            }
            (Role::Child, Some(family)) => grafter.link_child(family, &dest_id),
            _ => false,
        };
        linked.then_some(dest_id)
    }
}

/// First record of `kind` under `owner`, unless it carries neither date nor place
fn first_event(owner: &Record, kind: EventKind) -> Option<Event<'_>> {
    owner
        .child(kind.tag())
        .and_then(|r| Event::from_record(owner.id(), r))
        .filter(|e| !e.is_empty())
}

fn parent_family<'s>(store: &'s Gedcom, id: &str) -> Option<Family<'s>> {
    store
        .individual(id)
        .and_then(|i| i.parent_family())
        .and_then(|f| store.family(f))
}

fn spouse_families<'s>(store: &'s Gedcom, id: &str) -> Vec<Family<'s>> {
    store
        .individual(id)
        .map(|i| {
            i.spouse_families()
                .into_iter()
                .filter_map(|f| store.family(f))
                .collect()
        })
        .unwrap_or_default()
}

fn children<'s>(store: &'s Gedcom, family: &Family<'s>) -> Vec<Individual<'s>> {
    family
        .children()
        .into_iter()
        .filter_map(|c| store.individual(c))
        .collect()
}
