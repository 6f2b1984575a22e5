mod common;

use bytes::Bytes;
use common::{light_array, reencode};
use std::collections::BTreeMap;
use tessera_common::{BlockPos, ChunkPos, ConnectionProtocol, LightChannel, Vec3};
use tessera_nbt::{Compound, Tag};
use tessera_protocol::chunk_data::{BlockEntityInfo, ChunkSnapshot, HeightmapKind};
use tessera_protocol::light_data::{ChannelLight, LightData};
use tessera_protocol::packets::*;
use tessera_protocol::protocol::*;
use tessera_protocol::registry::ResourceLocation;
use uuid::Uuid;

#[test]
fn test_login_sequence_packets() {
    let hello = ServerboundPacket::from(LoginServerbound::from(HelloPacket {
        name: "Steve".to_string(),
        profile_id: Uuid::from_u128(0x1234),
    }));
    assert_eq!(reencode(&hello, ConnectionProtocol::Login).unwrap(), hello);

    let mut profile = GameProfile::offline("Steve");
    profile.properties.push(ProfileProperty {
        name: "textures".to_string(),
        value: "e30=".to_string(),
        signature: None,
    });
    let finished = ClientboundPacket::from(LoginClientbound::from(LoginFinishedPacket::new(profile)));
    assert_eq!(reencode(&finished, ConnectionProtocol::Login).unwrap(), finished);
}

#[test]
fn test_configuration_packets() {
    let information = ServerboundPacket::from(ConfigurationServerbound::from(ClientInformationPacket {
        language: "en_us".to_string(),
        view_distance: 12,
        chat_visibility: ChatVisibility::Full,
        chat_colors: true,
        model_customisation: 0x7f,
        main_hand: HumanoidArm::Right,
        text_filtering_enabled: false,
        allows_listing: true,
        particle_status: ParticleStatus::Decreased,
    }));
    assert_eq!(reencode(&information, ConnectionProtocol::Configuration).unwrap(), information);

    let payload = ClientboundPacket::from(ConfigurationClientbound::from(
        ClientboundCustomPayloadPacket {
            channel: ResourceLocation::minecraft("brand").unwrap(),
            data: Bytes::from_static(b"\x07tessera"),
        },
    ));
    assert_eq!(reencode(&payload, ConnectionProtocol::Configuration).unwrap(), payload);
}

#[test]
fn test_chunk_with_light() {
    let mut heightmaps = BTreeMap::new();
    heightmaps.insert(HeightmapKind::MotionBlocking, vec![0x0101_0101; 37]);
    heightmaps.insert(HeightmapKind::WorldSurface, vec![7; 37]);

    let mut sign = Compound::new();
    sign.insert("is_waxed".to_string(), Tag::Byte(1));
    let block_entities = vec![
        BlockEntityInfo::new(BlockPos::new(3, 64, 9), 7, sign),
        BlockEntityInfo::new(BlockPos::new(15, -64, 0), 2, Compound::new()),
    ];

    let mut light = LightData::default();
    light.channel_mut(LightChannel::Sky).set_present(25, light_array(0xff));
    light.channel_mut(LightChannel::Sky).set_empty(0);
    light.channel_mut(LightChannel::Block).set_present(5, light_array(0x12));

    let packet = ClientboundPacket::from(PlayClientbound::from(LevelChunkWithLightPacket {
        pos: ChunkPos::new(-2, 5),
        chunk_data: ChunkSnapshot::new(heightmaps, Bytes::from(vec![0u8; 24 * 8]), block_entities),
        light_data: light,
    }));

    let decoded = reencode(&packet, ConnectionProtocol::Play).unwrap();
    assert_eq!(decoded, packet);

    let ClientboundPacket::Play(PlayClientbound::LevelChunkWithLight(chunk)) = decoded else {
        panic!("decoded as another packet");
    };
    let entity = &chunk.chunk_data.block_entities()[0];
    assert_eq!(entity.packed_xz, (3 << 4) | 9);
    assert_eq!(entity.position(chunk.pos), BlockPos::new(-32 + 3, 64, 80 + 9));
    assert_eq!(chunk.chunk_data.block_entities()[1].tag, None);
}

#[test]
fn test_light_update_with_changed_subset() {
    let mut sky = ChannelLight::new();
    sky.set_present(1, light_array(0xf0));
    sky.set_present(2, light_array(0x0f));
    let packet = ClientboundPacket::from(PlayClientbound::from(LightUpdatePacket {
        pos: ChunkPos::new(100, -100),
        light_data: LightData::new(false, sky, ChannelLight::new()),
    }));
    assert_eq!(reencode(&packet, ConnectionProtocol::Play).unwrap(), packet);
}

#[test]
fn test_entity_packets() {
    let add = ClientboundPacket::from(PlayClientbound::from(AddEntityPacket::new(
        42,
        Uuid::from_u128(7),
        151,
        Vec3::new(0.5, 64.0, -12.25),
        -30.0,
        270.0,
        90.0,
        0,
        Vec3::new(0.25, -0.5, 5.0),
    )));
    assert_eq!(reencode(&add, ConnectionProtocol::Play).unwrap(), add);

    let sound = ClientboundPacket::from(PlayClientbound::from(SoundPacket::new(
        SoundHolder::Direct(SoundEvent {
            location: "tessera:chime".parse().unwrap(),
            fixed_range: Some(16.0),
        }),
        SoundSource::Blocks,
        Vec3::new(1.5, 2.0, -3.125),
        1.0,
        0.8,
        99,
    )));
    assert_eq!(reencode(&sound, ConnectionProtocol::Play).unwrap(), sound);
}

#[test]
fn test_serverbound_play_packets() {
    let packets = [
        PlayServerbound::from(ChatCommandPacket {
            command: "time set day".to_string(),
        }),
        PlayServerbound::from(MovePlayerPosPacket {
            position: Vec3::new(8.5, 70.0, -4.5),
            on_ground: true,
        }),
        PlayServerbound::from(SetCarriedItemPacket { slot: 4 }),
        PlayServerbound::from(KeepAlivePacket::new(i64::MIN)),
    ];
    for packet in packets {
        let packet = ServerboundPacket::from(packet);
        assert_eq!(reencode(&packet, ConnectionProtocol::Play).unwrap(), packet);
    }
}
