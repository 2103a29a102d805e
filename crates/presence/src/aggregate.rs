use worldtray_protocol::{Roster, Uid, WorldStatusSet};

/// An online player with a resolved display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlinePerson {
    pub uid: Uid,
    /// Roster name, or the uid itself when the roster has none.
    pub display_name: String,
}

impl OnlinePerson {
    /// Resolves `uid` against `roster`. Unknown people are displayed by uid.
    pub fn resolve(roster: &Roster, uid: &Uid) -> Self {
        let display_name = roster
            .get(uid)
            .and_then(|person| person.name.clone())
            .unwrap_or_else(|| uid.to_string());
        Self {
            uid: uid.clone(),
            display_name,
        }
    }
}

/// One world as it should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldPresence {
    pub name: String,
    pub version: Option<String>,
    pub running: bool,
    /// Online players in server order.
    pub online: Vec<OnlinePerson>,
}

impl WorldPresence {
    /// Whether an offline marker should be shown for this world.
    ///
    /// A running world with nobody online gets no marker and no entries.
    pub fn is_offline(&self) -> bool {
        !self.running
    }
}

/// Renderer-agnostic summary of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationState {
    /// Every reported world in world-name order.
    pub worlds: Vec<WorldPresence>,
    /// Sum of all online lists. A player in two worlds counts twice.
    pub total_online: usize,
    /// Set iff `total_online == 1`.
    pub single_online: Option<OnlinePerson>,
}

impl PresentationState {
    /// Returns the world with the given name.
    pub fn world(&self, name: &str) -> Option<&WorldPresence> {
        self.worlds.iter().find(|world| world.name == name)
    }
}

/// Merges the roster with world statuses.
pub fn aggregate(roster: &Roster, statuses: &WorldStatusSet) -> PresentationState {
    let worlds: Vec<WorldPresence> = statuses
        .iter()
        .map(|(name, status)| WorldPresence {
            name: name.clone(),
            version: status.version.clone(),
            running: status.running,
            online: status
                .list
                .iter()
                .map(|uid| OnlinePerson::resolve(roster, uid))
                .collect(),
        })
        .collect();

    let total_online = worlds.iter().map(|world| world.online.len()).sum();

    let single_online = if total_online == 1 {
        worlds.iter().flat_map(|world| &world.online).next().cloned()
    } else {
        None
    };

    PresentationState {
        worlds,
        total_online,
        single_online,
    }
}

/// Drops ignored players from every online list.
pub fn remove_ignored(statuses: &mut WorldStatusSet, ignored: &[Uid]) {
    if ignored.is_empty() {
        return;
    }
    for status in statuses.values_mut() {
        status.list.retain(|uid| !ignored.contains(uid));
    }
}
