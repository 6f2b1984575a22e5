pub mod chat;
pub mod chunk;
pub mod common;
pub mod entity;
pub mod handshake;
pub mod login;
pub mod player;
pub mod sound;
pub mod status;

pub use chat::{ChatCommandPacket, SystemChatPacket};
pub use chunk::{
    BlockUpdatePacket, ForgetLevelChunkPacket, LevelChunkWithLightPacket, LightUpdatePacket,
    SetChunkCacheCenterPacket,
};
pub use common::{
    ChatVisibility, ClientInformationPacket, ClientboundCustomPayloadPacket, DisconnectPacket,
    FinishConfigurationPacket, HumanoidArm, KeepAlivePacket, ParticleStatus,
    ServerboundCustomPayloadPacket,
};
pub use entity::{AddEntityPacket, MoveEntityRotPacket, SetEntityMotionPacket, SetHealthPacket};
pub use handshake::{ClientIntent, ClientIntentionPacket};
pub use login::{
    GameProfile, HelloPacket, LoginAcknowledgedPacket, LoginDisconnectPacket,
    LoginFinishedPacket, ProfileProperty,
};
pub use player::{MovePlayerPosPacket, SetCarriedItemPacket};
pub use sound::{SoundEvent, SoundHolder, SoundPacket, SoundSource};
pub use status::{
    PingRequestPacket, PongResponsePacket, ServerStatus, StatusRequestPacket,
    StatusResponsePacket,
};
