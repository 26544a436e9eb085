// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Linkage Sandbox
// Links a library whose speaker is shared by local and library objects,
// then makes the library local.

use anyhow::Result;
use linkage_agents::LibraryAgent;
use linkage_core::LifecycleConfig;
use linkage_data::{Object, Sound};

const CONFIG: &str = "(check_invariants: true, max_datablocks: Some(1024))";

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = LifecycleConfig::from_ron_str(CONFIG)?;
    let mut agent = LibraryAgent::new(config);
    agent.set_main_file("/proj/scene.blend");
    let lib = agent.link_library("props", "/proj/libs/props.blend");

    let sound = agent
        .database_mut()
        .link(lib, Sound::new("Hum", "//sounds/hum.wav"))?;
    let speaker = agent.link_speaker(lib, "Radio")?;
    agent.database_mut().assign_sound(speaker, Some(sound))?;

    let db = agent.database_mut();
    for name in ["Kitchen", "Hallway"] {
        let obj = db.add_object(name)?;
        db.assign_object_data(obj, Some(speaker))?;
    }
    let prop = db.link(lib, Object::new("PropRadio"))?;
    db.assign_object_data(prop, Some(speaker))?;

    let (lifecycle, localize) = agent.strategies();
    log::info!("Strategies: {lifecycle}, {localize}");
    log::info!("Before: {}", agent.report_status());

    for (id, outcome) in agent.make_library_local(lib)? {
        log::info!("{id:?} -> {outcome:?}");
    }
    agent.verify()?;

    log::info!("After: {}", agent.report_status());
    for (id, speaker) in agent.database().speakers().iter() {
        log::info!(
            "{id:?} '{}' users={} linked={}",
            speaker.id.name,
            speaker.id.users,
            speaker.id.is_linked()
        );
    }
    Ok(())
}
